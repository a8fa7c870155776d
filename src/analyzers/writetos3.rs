use serde::Serialize;
use tracing::info;

/// Serializes a chart document to JSON and uploads it to an S3 bucket with
/// `application/json` content type.
#[tracing::instrument(skip(client, value))]
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
) -> anyhow::Result<()> {
    let body = serde_json::to_vec(value)?;
    let size = body.len();

    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body.into())
        .content_type("application/json")
        .cache_control("max-age=300")
        .send()
        .await?;

    info!(size, "Chart document published");
    Ok(())
}
