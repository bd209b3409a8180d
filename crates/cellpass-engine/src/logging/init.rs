use std::sync::Once;

/// Modules that log per-call detail at info and drown out the stage log.
const GPU_STACK_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration for hosts embedding the engine.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives, e.g. "cellpass_engine=debug".
    ///
    /// Takes precedence over `RUST_LOG`.
    pub filter: Option<String>,

    /// Cap wgpu and naga at warn when no directive mentions them.
    pub quiet_gpu_stack: bool,

    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            quiet_gpu_stack: true,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Filter string the logger is built from: explicit config, then `env`, then
/// plain `info`. The GPU stack cap is appended unless a directive names it.
fn resolve_filter(config: &LoggingConfig, env: Option<String>) -> String {
    let mut filter = config
        .filter
        .clone()
        .or(env)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| "info".to_string());

    if config.quiet_gpu_stack {
        for module in GPU_STACK_MODULES {
            if !filter.contains(module) {
                filter.push_str(&format!(",{module}=warn"));
            }
        }
    }
    filter
}

static INIT: Once = Once::new();

/// Installs the global `env_logger` on first call; later calls are no-ops.
///
/// Returns `false` when another logger already owns the `log` facade.
pub fn init_logging(config: LoggingConfig) -> bool {
    let mut installed = false;
    INIT.call_once(|| {
        let filter = resolve_filter(&config, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        installed = builder.try_init().is_ok();
        if installed {
            log::debug!("logging initialized with `{filter}`");
        }
    });
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_info_with_quiet_gpu_stack() {
        let filter = resolve_filter(&LoggingConfig::default(), None);
        assert_eq!(filter, "info,wgpu_core=warn,wgpu_hal=warn,naga=warn");
    }

    #[test]
    fn explicit_filter_beats_env() {
        let config = LoggingConfig {
            filter: Some("cellpass_engine=debug".into()),
            quiet_gpu_stack: false,
            ..LoggingConfig::default()
        };
        let filter = resolve_filter(&config, Some("trace".into()));
        assert_eq!(filter, "cellpass_engine=debug");
    }

    #[test]
    fn env_is_used_when_config_is_silent() {
        let config = LoggingConfig {
            quiet_gpu_stack: false,
            ..LoggingConfig::default()
        };
        assert_eq!(resolve_filter(&config, Some("warn".into())), "warn");
        assert_eq!(resolve_filter(&config, Some("  ".into())), "info");
    }

    #[test]
    fn named_gpu_module_is_left_alone() {
        let filter = resolve_filter(&LoggingConfig::default(), Some("debug,wgpu_hal=trace".into()));
        assert_eq!(filter, "debug,wgpu_hal=trace,wgpu_core=warn,naga=warn");
    }
}
