//! Flags shared by the commands that generate resources.

use clap::Args;
use mg_config::{UserConfig, parse_pair};
use mg_core::params::{AntiAffinity, DEFAULT_AFFINITY_WEIGHT, DEFAULT_CONTEXT, DEFAULT_TOPOLOGY_KEY};
use mg_core::{OutputFormat, RuntimeParams};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct CommonFlags {
    /// Target namespace, defaults to the current kube context namespace
    #[arg(short, long, env = "MG_NAMESPACE")]
    pub namespace: Option<String>,

    /// Do not contact the cluster, render resources instead
    #[arg(long)]
    pub dryrun: bool,

    /// Render generated resources to stdout
    #[arg(short, long)]
    pub output: bool,

    /// Output format (json or yaml)
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Write rendered resources to a file instead of stdout
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    /// Suffix appended to resource names
    #[arg(long = "version")]
    pub version_override: Option<String>,

    /// Branch or ref to build from instead of the declared branch
    #[arg(long = "ref")]
    pub source_ref: Option<String>,

    /// Image stream builds push to
    #[arg(short = 'i', long = "istream")]
    pub output_imagestream: Option<String>,

    /// Tag builds push to and workloads run
    #[arg(long)]
    pub tag: Option<String>,

    /// Registry serving workload images
    #[arg(short, long, env = "MG_REGISTRY")]
    pub registry: Option<String>,

    /// Namespace holding workload images, defaults to the target namespace
    #[arg(long = "imagens")]
    pub image_namespace: Option<String>,

    /// Context path exposed by the route
    #[arg(short, long, default_value = DEFAULT_CONTEXT)]
    pub context: String,

    /// Number of replicas
    #[arg(long)]
    pub replicas: Option<i32>,

    /// Spread pods with soft anti-affinity rules
    #[arg(long)]
    pub with_affinity_rules: bool,

    /// Topology key for anti-affinity rules
    #[arg(long)]
    pub topology_key: Option<String>,

    /// Weight of anti-affinity rules
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=100))]
    pub affinity_weight: Option<i32>,

    /// Populate declared default values
    #[arg(long)]
    pub defaults: bool,

    /// Import environment variables from the builder and base images
    #[arg(long)]
    pub base_envs: bool,

    /// Create global secrets
    #[arg(short = 'g', long = "globals")]
    pub create_globals: bool,

    /// Also delete secrets on teardown
    #[arg(long)]
    pub everything: bool,

    /// Variable overrides as KEY=value, comma separated
    #[arg(long, value_delimiter = ',')]
    pub cvars: Vec<String>,

    /// Properties file with variable overrides
    #[arg(long)]
    pub cvfile: Option<PathBuf>,

    /// Extra label put on generated resources, as key=value
    #[arg(long = "label", value_parser = parse_label)]
    pub labels: Vec<(String, String)>,
}

fn parse_label(s: &str) -> Result<(String, String), String> {
    parse_pair(s).map_err(|e| e.to_string())
}

impl CommonFlags {
    /// Merge flags over the user config. Flags win.
    pub fn into_params(self, user: &UserConfig) -> RuntimeParams {
        let pick = |flag: Option<String>, configured: &Option<String>| {
            flag.or_else(|| configured.clone()).unwrap_or_default()
        };

        RuntimeParams {
            namespace: pick(self.namespace, &user.namespace),
            dry_run: self.dryrun,
            // A dry run displays what it would have sent.
            output: self.output || self.dryrun || self.output_file.is_some(),
            format: self.format,
            output_file: self.output_file,
            version_override: self.version_override.unwrap_or_default(),
            source_ref: self.source_ref.unwrap_or_default(),
            output_imagestream: self.output_imagestream.unwrap_or_default(),
            tag: self.tag.unwrap_or_default(),
            registry: pick(self.registry, &user.registry),
            image_namespace: pick(self.image_namespace, &user.image_namespace),
            context: self.context,
            replicas: self.replicas,
            anti_affinity: AntiAffinity {
                enabled: self.with_affinity_rules,
                topology_key: self
                    .topology_key
                    .or_else(|| user.topology_key.clone())
                    .unwrap_or_else(|| DEFAULT_TOPOLOGY_KEY.to_string()),
                weight: self
                    .affinity_weight
                    .or(user.anti_affinity_weight)
                    .unwrap_or(DEFAULT_AFFINITY_WEIGHT),
            },
            everything: self.everything,
            defaults: self.defaults,
            base_envs: self.base_envs,
            create_globals: self.create_globals,
            labels: self.labels.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        flags: CommonFlags,
    }

    fn parse(args: &[&str]) -> CommonFlags {
        let mut argv = vec!["mg"];
        argv.extend_from_slice(args);
        Wrapper::try_parse_from(argv).unwrap().flags
    }

    #[test]
    fn test_flags_win_over_user_config() {
        let user = UserConfig {
            namespace: Some("dev".to_string()),
            registry: Some("registry.local:5000".to_string()),
            anti_affinity_weight: Some(50),
            ..Default::default()
        };

        let params = parse(&["-n", "shop", "--with-affinity-rules"]).into_params(&user);
        assert_eq!(params.namespace, "shop");
        assert_eq!(params.registry, "registry.local:5000");
        assert!(params.anti_affinity.enabled);
        assert_eq!(params.anti_affinity.weight, 50);
        assert_eq!(params.anti_affinity.topology_key, "kubernetes.io/hostname");
        assert_eq!(params.image_namespace(), "shop");
    }

    #[test]
    fn test_dry_run_renders() {
        let params = parse(&["--dryrun", "--format", "yaml"]).into_params(&UserConfig::default());
        assert!(params.dry_run);
        assert!(params.output);
        assert_eq!(params.format, OutputFormat::Yaml);
        assert_eq!(params.context, "/");
    }

    #[test]
    fn test_output_file_enables_rendering() {
        let params = parse(&["--output-file", "out.yaml"]).into_params(&UserConfig::default());
        assert!(params.output);
        assert!(!params.dry_run);
        assert_eq!(params.output_file, Some(PathBuf::from("out.yaml")));
    }

    #[test]
    fn test_overrides_and_labels() {
        let flags = parse(&[
            "--cvars",
            "DB_HOST=prod-db,LOG_LEVEL=debug",
            "--label",
            "team=checkout",
            "--version",
            "pr12",
        ]);
        assert_eq!(flags.cvars, vec!["DB_HOST=prod-db", "LOG_LEVEL=debug"]);

        let params = flags.into_params(&UserConfig::default());
        assert_eq!(params.labels["team"], "checkout");
        assert_eq!(params.version_override, "pr12");
    }

    #[test]
    fn test_invalid_flags() {
        let mut argv = vec!["mg", "--affinity-weight", "500"];
        assert!(Wrapper::try_parse_from(&argv).is_err());
        argv = vec!["mg", "--label", "no-separator"];
        assert!(Wrapper::try_parse_from(&argv).is_err());
        argv = vec!["mg", "--format", "xml"];
        assert!(Wrapper::try_parse_from(&argv).is_err());
    }
}
