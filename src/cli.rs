//! Command-line interface definitions.
//!
//! Every option doubles as a GitHub Action input: the runner exposes an
//! input named `cloud-storage` as the environment variable
//! `INPUT_CLOUD-STORAGE`, which clap picks up through `env`.

use clap::Parser;
use std::path::PathBuf;

/// Generate Backstage TechDocs for catalog entities and publish them to cloud storage
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Workspace root every relative path is resolved against
    #[arg(short, long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,

    /// Config file name (default: techdocs.toml), optional
    #[arg(short = 'C', long, default_value = "techdocs.toml")]
    pub config: PathBuf,

    /// Storage driver: awsS3, googleGcs, azureBlobStorage or openStackSwift
    #[arg(long = "cloud-storage", env = "INPUT_CLOUD-STORAGE")]
    pub cloud_storage: Option<String>,

    /// Bucket or container the sites are uploaded to
    #[arg(long = "storage-name", env = "INPUT_STORAGE-NAME")]
    pub storage_name: Option<String>,

    /// Directory walked for descriptor files; unreadable ones are skipped
    #[arg(long = "publish-looking-path", env = "INPUT_PUBLISH-LOOKING-PATH")]
    pub publish_looking_path: Option<PathBuf>,

    /// Root catalog file expanded through its Location targets
    #[arg(long = "publish-looking-file", env = "INPUT_PUBLISH-LOOKING-FILE")]
    pub publish_looking_file: Option<PathBuf>,

    /// Docker image the generator runs in
    #[arg(long = "docker-image", env = "INPUT_DOCKER-IMAGE")]
    pub docker_image: Option<String>,

    #[command(flatten)]
    pub credentials: CredentialArgs,
}

/// Driver specific credentials. Only those of the selected driver are used.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Google Cloud Storage bucket root path
    #[arg(long = "gcs-bucket-root-path", env = "INPUT_GCS-BUCKET-ROOT-PATH")]
    pub gcs_bucket_root_path: Option<String>,

    /// Azure storage account name (required for azureBlobStorage)
    #[arg(long = "azure-account-name", env = "INPUT_AZURE-ACCOUNT-NAME")]
    pub azure_account_name: Option<String>,

    /// Azure storage account key
    #[arg(long = "azure-account-key", env = "INPUT_AZURE-ACCOUNT-KEY")]
    pub azure_account_key: Option<String>,

    /// AWS role to assume
    #[arg(long = "aws-role-arn", env = "INPUT_AWS-ROLE-ARN")]
    pub aws_role_arn: Option<String>,

    /// Custom S3 compatible endpoint
    #[arg(long = "aws-endpoint", env = "INPUT_AWS-ENDPOINT")]
    pub aws_endpoint: Option<String>,

    /// S3 server side encryption mode
    #[arg(long = "awsS3-sse", env = "INPUT_AWSS3-SSE")]
    pub aws_s3_sse: Option<String>,

    /// Force path style S3 URLs
    #[arg(long = "awsS3-force-path-style", env = "INPUT_AWSS3-FORCE-PATH-STYLE")]
    pub aws_s3_force_path_style: Option<String>,

    /// OpenStack application credential id
    #[arg(long = "os-credential-id", env = "INPUT_OS-CREDENTIAL-ID")]
    pub os_credential_id: Option<String>,

    /// OpenStack application credential secret
    #[arg(long = "os-secret", env = "INPUT_OS-SECRET")]
    pub os_secret: Option<String>,

    /// OpenStack identity endpoint
    #[arg(long = "os-auth-url", env = "INPUT_OS-AUTH-URL")]
    pub os_auth_url: Option<String>,

    /// OpenStack Swift endpoint
    #[arg(long = "os-swift-url", env = "INPUT_OS-SWIFT-URL")]
    pub os_swift_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_mode_flags() {
        let cli = Cli::try_parse_from([
            "techdocs-action",
            "--workspace",
            "/repo",
            "--cloud-storage",
            "azureBlobStorage",
            "--azure-account-name",
            "mycompany",
            "--publish-looking-file",
            "catalog-info.yaml",
        ])
        .unwrap();

        assert_eq!(cli.workspace, PathBuf::from("/repo"));
        assert_eq!(cli.cloud_storage.as_deref(), Some("azureBlobStorage"));
        assert_eq!(
            cli.credentials.azure_account_name.as_deref(),
            Some("mycompany")
        );
        assert_eq!(
            cli.publish_looking_file,
            Some(PathBuf::from("catalog-info.yaml"))
        );
        assert!(cli.publish_looking_path.is_none());
    }

    #[test]
    fn test_parse_mixed_case_aws_flags() {
        let cli = Cli::try_parse_from([
            "techdocs-action",
            "--awsS3-sse",
            "aws:kms",
            "--awsS3-force-path-style",
            "true",
        ])
        .unwrap();

        assert_eq!(cli.credentials.aws_s3_sse.as_deref(), Some("aws:kms"));
        assert_eq!(cli.credentials.aws_s3_force_path_style.as_deref(), Some("true"));
        assert_eq!(cli.config, PathBuf::from("techdocs.toml"));
    }
}
