pub mod args;
pub mod breakpoints;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod extractor;
pub mod injector;
pub mod math;
pub mod parser;
pub mod registry;
pub mod rules;
pub mod source;
pub mod validators;
pub mod watch;

pub use args::{BuildArgs, Cli, Commands, InitArgs, PipeArgs};
pub use breakpoints::{BreakpointTable, BreakpointValue, DEFAULT_BREAKPOINTS};
pub use compiler::{escape_class, CompiledClass, Compiler, EmitMode};
pub use config::{InjectConfig, InjectMode, ValcssConfig};
pub use diagnostics::{Diagnostic, Severity};
pub use errors::{Result, ValcssError};
pub use extractor::{extract_classes, generate_css, ClassCollector, ClassInfo, CompileOutput};
pub use math::{normalize_calc_expression, normalize_css_math};
pub use parser::{parse_class, ParsedClass};
pub use registry::{Plugin, PluginRegistry, PluginUtility, UtilityPlugin, UtilityStyles, Variants};

use config::CONFIG_CANDIDATES;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Inputs to a build, independent of how they were gathered.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Explicit config file; discovered in `working_dir` when absent
    pub config: Option<PathBuf>,
    /// Overrides the config's `output`
    pub output: Option<String>,
    /// Return the CSS without writing or injecting anything
    pub dry_run: bool,
    pub working_dir: PathBuf,
}

impl BuildOptions {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: None,
            output: None,
            dry_run: false,
            working_dir: working_dir.into(),
        }
    }
}

impl From<&BuildArgs> for BuildOptions {
    fn from(args: &BuildArgs) -> Self {
        Self {
            config: args.config.clone(),
            output: args.output.clone(),
            dry_run: args.dry_run,
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// Result of one build
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub css: String,
    pub diagnostics: Vec<Diagnostic>,
    pub files_processed: usize,
    /// Unique candidate tokens found across all files
    pub tokens: usize,
    /// Tokens that produced CSS
    pub compiled: usize,
    pub config_path: PathBuf,
    /// Input files plus the config file
    pub watched: Vec<PathBuf>,
    /// Stylesheet and HTML targets written by this build
    pub written: Vec<PathBuf>,
}

impl BuildResult {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

/// Runs builds with a compiler context that survives between runs.
///
/// Every run reloads the config and reconfigures the compiler, which resets
/// the plugin registry before replaying the configured plugins.
#[derive(Debug, Clone)]
pub struct Builder {
    options: BuildOptions,
    compiler: Compiler,
}

impl Builder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            compiler: Compiler::new(),
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn run(&mut self) -> Result<BuildResult> {
        let start_time = Instant::now();
        let explicit = self
            .options
            .config
            .as_ref()
            .map(|path| self.options.working_dir.join(path));
        let (config, config_path) = ValcssConfig::load(explicit.as_deref(), &self.options.working_dir)?;
        tracing::debug!("Loaded config from {}", config_path.display());

        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.options.working_dir.clone());

        let mut diagnostics = self.compiler.reconfigure(&config.breakpoints, &config.plugins);

        let patterns: Vec<String> = config
            .files
            .iter()
            .map(|pattern| relative_to(&base_dir, pattern).to_string_lossy().into_owned())
            .collect();
        let files = source::resolve_files(&patterns)?;

        let mut watched = files.clone();
        watched.push(config_path.clone());

        let mut result = BuildResult {
            css: String::new(),
            diagnostics: Vec::new(),
            files_processed: files.len(),
            tokens: 0,
            compiled: 0,
            config_path,
            watched,
            written: Vec::new(),
        };

        if files.is_empty() {
            diagnostics.push(Diagnostic::warning("No matching files found", config.files.join(", ")));
            result.diagnostics = diagnostics;
            return Ok(result);
        }

        tracing::info!("Generating CSS for {} files...", files.len());
        let documents = source::load_documents(&files)?;
        let mut collector = ClassCollector::new(&self.compiler);
        for document in &documents {
            collector.add_document(&document.content, &document.path.display().to_string());
        }
        let output = collector.generate_css();
        diagnostics.extend(output.diagnostics);
        result.css = output.css;
        result.tokens = output.tokens;
        result.compiled = output.compiled;

        if !self.options.dry_run {
            let output_path = relative_to(
                &base_dir,
                self.options.output.as_deref().unwrap_or(config.output.as_str()),
            );
            let targets: Vec<PathBuf> = config
                .inject
                .targets
                .iter()
                .map(|target| relative_to(&base_dir, target))
                .collect();
            if targets.is_empty() && config.inject.mode == InjectMode::Inline {
                diagnostics.push(Diagnostic::warning("No inject targets found", "inject.targets"));
            }

            let report = injector::inject(&result.css, &output_path, config.inject.mode, &targets)?;
            diagnostics.extend(report.diagnostics);
            result.written.extend(report.stylesheet);
            result.written.extend(report.updated);
        }

        result.diagnostics = diagnostics;
        tracing::debug!(
            "Built {} of {} classes in {:.2}s",
            result.compiled,
            result.tokens,
            start_time.elapsed().as_secs_f64()
        );
        Ok(result)
    }
}

/// Load the config, compile every matching file and deliver the CSS.
pub fn build(options: &BuildOptions) -> Result<BuildResult> {
    Builder::new(options.clone()).run()
}

/// Write a default config into `dir`, refusing to replace an existing one.
pub fn init(dir: &Path, args: &InitArgs) -> Result<PathBuf> {
    if let Some(existing) = CONFIG_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
    {
        return Err(ValcssError::ConfigError {
            message: format!("{} already exists", existing.display()),
        });
    }

    let config = ValcssConfig::default();
    let (path, content) = if args.yaml {
        (dir.join("valcss.config.yaml"), serde_yaml::to_string(&config)?)
    } else {
        (dir.join("valcss.config.json"), config.to_json_pretty()?)
    };

    std::fs::write(&path, content).map_err(|e| ValcssError::OutputError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(path)
}

/// Compile markup read from a stream with default breakpoints and no plugins.
pub fn pipe(input: &str, args: &PipeArgs) -> CompileOutput {
    let content = if args.keep_comments {
        input.to_string()
    } else {
        source::strip_comments(input)
    };
    generate_css(&[content], &Compiler::new())
}

fn relative_to(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
