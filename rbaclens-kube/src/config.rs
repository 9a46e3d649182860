//! Cluster connection configuration.
//!
//! A [`ClusterConfig`] is resolved from, in order:
//!
//! 1. an explicit kubeconfig path ([`ConfigOptions::kubeconfig`]);
//! 2. the first path in the `KUBECONFIG` environment variable;
//! 3. `~/.kube/config`, if it exists;
//! 4. the in-cluster service account, when `KUBERNETES_SERVICE_HOST` is set.
//!
//! Only bearer-token authentication is read from kubeconfig files. Client
//! certificates and exec plugins are ignored; the request then goes out
//! unauthenticated and the API server decides what an anonymous user may do.

use crate::error::KubeError;
use base64::Engine;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory holding the mounted service account credentials.
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// Namespace used when neither the kubeconfig context nor the service
/// account names one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Everything needed to reach and authenticate against one API server.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Base URL of the API server, e.g. `https://10.0.0.1:6443`.
    pub server: String,
    pub token: Option<String>,
    /// PEM bundle used to verify the server certificate.
    pub ca_pem: Option<Vec<u8>>,
    pub insecure_skip_tls_verify: bool,
    pub namespace: String,
}

impl std::fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("server", &self.server)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("ca_pem", &self.ca_pem.as_ref().map(|pem| pem.len()))
            .field("insecure_skip_tls_verify", &self.insecure_skip_tls_verify)
            .field("namespace", &self.namespace)
            .finish()
    }
}

/// Caller overrides for [`ClusterConfig::load`].
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub kubeconfig: Option<PathBuf>,
    /// Context to use instead of `current-context`.
    pub context: Option<String>,
    /// Skip server certificate verification regardless of the kubeconfig.
    pub insecure_skip_tls_verify: bool,
}

impl ClusterConfig {
    /// Resolve the configuration from the usual sources.
    pub fn load(options: &ConfigOptions) -> Result<Self, KubeError> {
        let mut config = match kubeconfig_path(options) {
            Some(path) => {
                log::debug!("loading kubeconfig from {}", path.display());
                Self::from_kubeconfig(&path, options.context.as_deref())?
            }
            None => {
                log::debug!("no kubeconfig found, trying in-cluster configuration");
                Self::in_cluster()?
            }
        };

        if options.insecure_skip_tls_verify {
            config.insecure_skip_tls_verify = true;
        }
        Ok(config)
    }

    /// Read a kubeconfig file.
    ///
    /// Relative `certificate-authority` and `tokenFile` paths are resolved
    /// against the file's directory.
    pub fn from_kubeconfig(path: &Path, context: Option<&str>) -> Result<Self, KubeError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            KubeError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_kubeconfig_str(&contents, context, path.parent())
    }

    /// Parse kubeconfig YAML.
    pub fn from_kubeconfig_str(
        contents: &str,
        context: Option<&str>,
        base_dir: Option<&Path>,
    ) -> Result<Self, KubeError> {
        let kubeconfig: Kubeconfig = serde_yaml::from_str(contents)
            .map_err(|e| KubeError::Configuration(format!("Invalid kubeconfig: {}", e)))?;

        let context_name = context
            .map(str::to_string)
            .or(kubeconfig.current_context.clone())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                KubeError::Configuration("kubeconfig has no current-context".to_string())
            })?;

        let context = kubeconfig
            .contexts
            .iter()
            .find(|c| c.name == context_name)
            .map(|c| &c.context)
            .ok_or_else(|| {
                KubeError::Configuration(format!("context {:?} not found", context_name))
            })?;

        let cluster = kubeconfig
            .clusters
            .iter()
            .find(|c| c.name == context.cluster)
            .map(|c| &c.cluster)
            .ok_or_else(|| {
                KubeError::Configuration(format!("cluster {:?} not found", context.cluster))
            })?;

        let user = context
            .user
            .as_deref()
            .and_then(|name| kubeconfig.users.iter().find(|u| u.name == name))
            .map(|u| &u.user);

        let ca_pem = match (
            &cluster.certificate_authority_data,
            &cluster.certificate_authority,
        ) {
            (Some(data), _) => Some(
                base64::engine::general_purpose::STANDARD
                    .decode(data.trim())
                    .map_err(|e| {
                        KubeError::Configuration(format!(
                            "Invalid certificate-authority-data: {}",
                            e
                        ))
                    })?,
            ),
            (None, Some(file)) => Some(read_file(&resolve(base_dir, file))?),
            (None, None) => None,
        };

        let token = match user {
            Some(KubeconfigUser {
                token: Some(token), ..
            }) => Some(token.clone()),
            Some(KubeconfigUser {
                token_file: Some(file),
                ..
            }) => Some(read_token(&resolve(base_dir, file))?),
            _ => None,
        };

        Ok(Self {
            server: cluster.server.trim_end_matches('/').to_string(),
            token,
            ca_pem,
            insecure_skip_tls_verify: cluster.insecure_skip_tls_verify,
            namespace: context
                .namespace
                .clone()
                .filter(|ns| !ns.is_empty())
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
        })
    }

    /// Build the configuration of a pod's service account.
    pub fn in_cluster() -> Result<Self, KubeError> {
        let host = std::env::var("KUBERNETES_SERVICE_HOST").map_err(|_| {
            KubeError::Configuration(
                "no kubeconfig found and KUBERNETES_SERVICE_HOST is not set".to_string(),
            )
        })?;
        let port = std::env::var("KUBERNETES_SERVICE_PORT").unwrap_or_else(|_| "443".to_string());
        Self::in_cluster_from(Path::new(SERVICE_ACCOUNT_DIR), &host, &port)
    }

    /// Build an in-cluster configuration from a service account directory.
    pub fn in_cluster_from(dir: &Path, host: &str, port: &str) -> Result<Self, KubeError> {
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]", host)
        } else {
            host.to_string()
        };

        let ca_path = dir.join("ca.crt");
        let ca_pem = if ca_path.exists() {
            Some(read_file(&ca_path)?)
        } else {
            None
        };

        let namespace = std::fs::read_to_string(dir.join("namespace"))
            .map(|ns| ns.trim().to_string())
            .ok()
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        Ok(Self {
            server: format!("https://{}:{}", host, port),
            token: Some(read_token(&dir.join("token"))?),
            ca_pem,
            insecure_skip_tls_verify: false,
            namespace,
        })
    }
}

fn kubeconfig_path(options: &ConfigOptions) -> Option<PathBuf> {
    if let Some(path) = &options.kubeconfig {
        return Some(path.clone());
    }

    if let Some(value) = std::env::var_os("KUBECONFIG") {
        if let Some(first) = std::env::split_paths(&value).find(|p| !p.as_os_str().is_empty()) {
            return Some(first);
        }
    }

    dirs::home_dir()
        .map(|home| home.join(".kube").join("config"))
        .filter(|path| path.exists())
}

fn resolve(base_dir: Option<&Path>, file: &str) -> PathBuf {
    let path = PathBuf::from(file);
    match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, KubeError> {
    std::fs::read(path).map_err(|e| {
        KubeError::Configuration(format!("Failed to read {}: {}", path.display(), e))
    })
}

fn read_token(path: &Path) -> Result<String, KubeError> {
    let bytes = read_file(path)?;
    let token = String::from_utf8(bytes).map_err(|_| {
        KubeError::Configuration(format!("Token file {} is not UTF-8", path.display()))
    })?;
    Ok(token.trim().to_string())
}

// ============================================================================
// Kubeconfig file format
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Kubeconfig {
    #[serde(default)]
    current_context: Option<String>,
    #[serde(default)]
    clusters: Vec<NamedCluster>,
    #[serde(default)]
    contexts: Vec<NamedContext>,
    #[serde(default)]
    users: Vec<NamedUser>,
}

#[derive(Debug, Deserialize)]
struct NamedCluster {
    name: String,
    cluster: KubeconfigCluster,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct KubeconfigCluster {
    server: String,
    #[serde(default)]
    certificate_authority: Option<String>,
    #[serde(default)]
    certificate_authority_data: Option<String>,
    #[serde(default)]
    insecure_skip_tls_verify: bool,
}

#[derive(Debug, Deserialize)]
struct NamedContext {
    name: String,
    context: KubeconfigContext,
}

#[derive(Debug, Deserialize)]
struct KubeconfigContext {
    cluster: String,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedUser {
    name: String,
    #[serde(default)]
    user: KubeconfigUser,
}

#[derive(Debug, Default, Deserialize)]
struct KubeconfigUser {
    #[serde(default)]
    token: Option<String>,
    #[serde(default, rename = "tokenFile")]
    token_file: Option<String>,
}
