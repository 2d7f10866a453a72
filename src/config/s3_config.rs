use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{Client as S3Client, config::Credentials};

use crate::config::S3Config;

pub async fn load_s3_client(config: &S3Config) -> S3Client {
    let credentials = Credentials::new(
        config.access_key_id.clone(),
        config.secret_access_key.clone(),
        None,
        None,
        "env-credentials",
    );

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .load()
        .await;

    let s3_client = S3Client::new(&sdk_config);

    tracing::info!(bucket = %config.bucket, "AWS S3 client initialized");

    s3_client
}
