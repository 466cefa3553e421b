//! `[storage]` section configuration.
//!
//! Selects the cloud storage driver the publisher uploads to and carries the
//! credential fields of every driver. Only the selected driver's fields are
//! validated and forwarded.

use super::{defaults, error::ConfigError};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Cloud storage backends understood by the publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageDriver {
    AwsS3,
    GoogleGcs,
    AzureBlobStorage,
    OpenStackSwift,
}

impl StorageDriver {
    pub const ALL: [Self; 4] = [
        Self::AwsS3,
        Self::GoogleGcs,
        Self::AzureBlobStorage,
        Self::OpenStackSwift,
    ];

    /// Publisher type name, as accepted by `--publisher-type`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwsS3 => "awsS3",
            Self::GoogleGcs => "googleGcs",
            Self::AzureBlobStorage => "azureBlobStorage",
            Self::OpenStackSwift => "openStackSwift",
        }
    }
}

impl fmt::Display for StorageDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageDriver {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|driver| driver.as_str() == s)
            .ok_or_else(|| ConfigError::UnsupportedStorage(s.to_owned()))
    }
}

/// One credential value together with its action input and publisher flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialField<'a> {
    /// Action input name, e.g. `azure-account-name`.
    pub input: &'static str,
    /// Publisher flag name without dashes, e.g. `azureAccountName`.
    pub flag: &'static str,
    pub value: &'a str,
}

impl<'a> CredentialField<'a> {
    const fn new(input: &'static str, flag: &'static str, value: &'a str) -> Self {
        Self { input, flag, value }
    }

    pub fn is_set(&self) -> bool {
        !self.value.is_empty()
    }
}

/// `[storage]` section in techdocs.toml.
///
/// # Example
/// ```toml
/// [storage]
/// driver = "azureBlobStorage"
/// name = "techdocs"
///
/// [storage.azure_blob_storage]
/// account_name = "mycompany"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Driver name: "awsS3", "googleGcs", "azureBlobStorage", "openStackSwift".
    #[serde(default = "defaults::storage::driver")]
    #[educe(Default = defaults::storage::driver())]
    pub driver: String,

    /// Target bucket or container.
    #[serde(default = "defaults::storage::name")]
    #[educe(Default = defaults::storage::name())]
    pub name: String,

    #[serde(default)]
    pub aws_s3: AwsS3Config,

    #[serde(default)]
    pub google_gcs: GoogleGcsConfig,

    #[serde(default)]
    pub azure_blob_storage: AzureBlobStorageConfig,

    #[serde(default)]
    pub open_stack_swift: OpenStackSwiftConfig,
}

/// `[storage.aws_s3]` - all fields optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AwsS3Config {
    pub role_arn: String,
    pub endpoint: String,
    pub sse: String,
    pub force_path_style: String,
}

/// `[storage.google_gcs]` - all fields optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GoogleGcsConfig {
    pub bucket_root_path: String,
}

/// `[storage.azure_blob_storage]` - `account_name` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AzureBlobStorageConfig {
    pub account_name: String,
    pub account_key: String,
}

/// `[storage.open_stack_swift]` - every field is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OpenStackSwiftConfig {
    pub credential_id: String,
    pub secret: String,
    pub auth_url: String,
    pub swift_url: String,
}

impl StorageConfig {
    /// Check the selected driver and its mandatory credentials.
    ///
    /// Must succeed before any descriptor is read.
    pub fn validate(&self) -> Result<StorageDriver, ConfigError> {
        let driver: StorageDriver = self.driver.parse()?;

        let required: &[&str] = match driver {
            StorageDriver::AzureBlobStorage => &["azure-account-name"],
            StorageDriver::OpenStackSwift => &[
                "os-credential-id",
                "os-secret",
                "os-auth-url",
                "os-swift-url",
            ],
            StorageDriver::AwsS3 | StorageDriver::GoogleGcs => &[],
        };

        if let Some(missing) = self
            .credentials(driver)
            .into_iter()
            .find(|field| required.contains(&field.input) && !field.is_set())
        {
            return Err(ConfigError::MissingCredential {
                driver: driver.as_str(),
                field: missing.input,
            });
        }

        Ok(driver)
    }

    /// Credential fields of `driver`, in publisher flag order.
    pub fn credentials(&self, driver: StorageDriver) -> Vec<CredentialField<'_>> {
        match driver {
            StorageDriver::AwsS3 => {
                let c = &self.aws_s3;
                vec![
                    CredentialField::new("aws-role-arn", "awsRoleArn", &c.role_arn),
                    CredentialField::new("aws-endpoint", "awsEndpoint", &c.endpoint),
                    CredentialField::new("awsS3-sse", "awsS3sse", &c.sse),
                    CredentialField::new(
                        "awsS3-force-path-style",
                        "awsS3ForcePathStyle",
                        &c.force_path_style,
                    ),
                ]
            }
            StorageDriver::GoogleGcs => vec![CredentialField::new(
                "gcs-bucket-root-path",
                "gcsBucketRootPath",
                &self.google_gcs.bucket_root_path,
            )],
            StorageDriver::AzureBlobStorage => {
                let c = &self.azure_blob_storage;
                vec![
                    CredentialField::new("azure-account-name", "azureAccountName", &c.account_name),
                    CredentialField::new("azure-account-key", "azureAccountKey", &c.account_key),
                ]
            }
            StorageDriver::OpenStackSwift => {
                let c = &self.open_stack_swift;
                vec![
                    CredentialField::new("os-credential-id", "osCredentialId", &c.credential_id),
                    CredentialField::new("os-secret", "osSecret", &c.secret),
                    CredentialField::new("os-auth-url", "osAuthUrl", &c.auth_url),
                    CredentialField::new("os-swift-url", "osSwiftUrl", &c.swift_url),
                ]
            }
        }
    }
}
