//! Reports whether this machine's Vulkan loader can create window surfaces
//! for the platform the binary was built for.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use thiserror::Error;
use vk_surface::{Config, ConfigError, InstanceConfig, SurfaceError};

#[derive(Error, Debug)]
enum CheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[cfg_attr(not(any(target_os = "android", target_os = "macos")), allow(dead_code))]
    #[error("Missing required extensions: {0}")]
    MissingExtensions(String),

    #[error("No surface platform is available for {0} (Android or macOS only)")]
    UnsupportedTarget(&'static str),
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    config: Option<PathBuf>,
    create_instance: bool,
}

impl Options {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config: matches.get_one::<String>("config").map(PathBuf::from),
            create_instance: matches.get_flag("create-instance"),
        }
    }
}

fn cli() -> Command {
    Command::new("surface_check")
        .about("Checks that the Vulkan loader can create window surfaces on this platform")
        .arg(
            Arg::new("config")
                .value_name("FILE")
                .help("Instance configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("create-instance")
                .long("create-instance")
                .help("Also create an instance and resolve the surface entry point")
                .action(ArgAction::SetTrue),
        )
}

fn run(options: &Options) -> Result<(), CheckError> {
    let config = match &options.config {
        Some(path) => InstanceConfig::load_from_file(path)?,
        None => InstanceConfig::new("surface_check"),
    };
    vk_surface::logging::init(&config.log_level);
    config.validate()?;

    check_platform(&config, options.create_instance)
}

#[cfg(any(target_os = "android", target_os = "macos"))]
fn check_platform(config: &InstanceConfig, create_instance: bool) -> Result<(), CheckError> {
    use log::{info, warn};
    use vk_surface::{instance, ActivePlatform, SurfacePlatform};

    info!(
        "Platform: {} ({} spec version {})",
        ActivePlatform::NAME,
        ActivePlatform::extension_name().to_string_lossy(),
        ActivePlatform::EXTENSION_SPEC_VERSION
    );
    for name in vk_surface::required_instance_extensions() {
        info!("Required instance extension: {}", name.to_string_lossy());
    }

    let entry = instance::load_entry()?;
    let support = instance::supported_extensions::<ActivePlatform>(&entry)?;
    let missing: Vec<String> = support
        .iter()
        .filter(|extension| !extension.supported)
        .map(|extension| extension.name.to_string_lossy().into_owned())
        .collect();
    if !missing.is_empty() {
        return Err(CheckError::MissingExtensions(missing.join(", ")));
    }
    info!("All required extensions are available");

    if create_instance {
        let instance = instance::create_instance::<ActivePlatform>(&entry, config)?;
        let entry_point = vk_surface::ActiveSurfaceEntryPoint::load(&entry, &instance);
        // SAFETY: no objects were created from the instance.
        unsafe { instance.destroy_instance(None) };
        match entry_point {
            Ok(_) => info!("Surface entry point {:?} resolved", ActivePlatform::ENTRY_POINT),
            Err(e) => {
                warn!("Instance created but surface entry point missing");
                return Err(e.into());
            }
        }
    }

    Ok(())
}

#[cfg(not(any(target_os = "android", target_os = "macos")))]
fn check_platform(_config: &InstanceConfig, _create_instance: bool) -> Result<(), CheckError> {
    Err(CheckError::UnsupportedTarget(std::env::consts::OS))
}

/// Logging may not be initialised when a failure happens, so failures are
/// reported on stderr only.
fn failure_message(error: &CheckError) -> String {
    format!("surface_check: {error}")
}

fn main() {
    let options = Options::from_matches(&cli().get_matches());
    if let Err(e) = run(&options) {
        eprintln!("{}", failure_message(&e));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        cli()
            .try_get_matches_from(args)
            .map(|matches| Options::from_matches(&matches))
    }

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_no_arguments() {
        let options = parse(&["surface_check"]).unwrap();
        assert_eq!(
            options,
            Options {
                config: None,
                create_instance: false
            }
        );
    }

    #[test]
    fn test_config_and_flag_in_any_order() {
        let options = parse(&["surface_check", "--create-instance", "check.toml"]).unwrap();
        assert_eq!(options.config, Some(PathBuf::from("check.toml")));
        assert!(options.create_instance);
    }

    #[test]
    fn test_help_is_not_a_config_path() {
        let error = parse(&["surface_check", "--help"]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_second_config_is_rejected() {
        let error = parse(&["surface_check", "a.toml", "b.toml"]).unwrap_err();
        assert!(matches!(
            error.kind(),
            ErrorKind::UnknownArgument | ErrorKind::TooManyValues
        ));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let error = parse(&["surface_check", "--create"]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_missing_config_fails_before_logging() {
        let options = parse(&["surface_check", "does_not_exist.toml"]).unwrap();
        let error = run(&options).unwrap_err();
        assert!(matches!(error, CheckError::Config(ConfigError::Io(_))));
    }

    #[test]
    fn test_failure_message_is_single_line() {
        let error = CheckError::MissingExtensions("VK_KHR_surface".to_string());
        let message = failure_message(&error);
        assert_eq!(
            message,
            "surface_check: Missing required extensions: VK_KHR_surface"
        );
        assert_eq!(message.lines().count(), 1);
    }

    #[cfg(not(any(target_os = "android", target_os = "macos")))]
    #[test]
    fn test_other_targets_report_unsupported() {
        let result = check_platform(&InstanceConfig::default(), false);
        assert!(matches!(result, Err(CheckError::UnsupportedTarget(os)) if os == std::env::consts::OS));
    }
}
