use dotenv::dotenv;
use gcloud_storage::client::google_cloud_auth::credentials::CredentialsFile;
use gcloud_storage::client::{Client, ClientConfig};
use gcloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use gcloud_storage::sign;
use gcloud_storage::sign::SignedURLOptions;
use std::borrow::Cow;
use std::env;
use std::path::Path;
use uuid;

fn bucket() -> String {
    dotenv().ok();
    env::var("STORE_BUCKET").unwrap_or_else(|_| String::from("rentdesk-store"))
}

async fn make_client() -> anyhow::Result<Client> {
    dotenv().ok();
    let credentials_path = env::var("GCLOUD_CREDENTIALS")?;
    let config = ClientConfig::default()
        .with_credentials(CredentialsFile::new_from_file(credentials_path).await?)
        .await?;
    Ok(Client::new(config))
}

/// Time-limited public URL for a stored object, embedded into the return
/// document and the UI photo viewer.
pub async fn get_signed_url(object_path: &str) -> anyhow::Result<String> {
    dotenv().ok();
    let client = make_client().await?;
    let google_access_id = env::var("GCLOUD_ACCESS_ID").ok();
    let url = client
        .signed_url(
            &bucket(),
            object_path,
            google_access_id,
            Some(sign::SignBy::SignBytes),
            SignedURLOptions::default(),
        )
        .await?;
    Ok(url)
}

/// Stores `data` under `object_dir` with a fresh UUID name and returns the
/// object path.
pub async fn upload_file(
    object_dir: String,
    file_name: String,
    data: Vec<u8>,
) -> anyhow::Result<String> {
    let path = Path::new(&file_name);
    let ext = path
        .extension()
        .unwrap_or("".as_ref())
        .to_str()
        .unwrap_or("")
        .to_uppercase();
    let content_type = match ext.as_str() {
        "PDF" => "application/pdf",
        "JPG" | "JPEG" => "image/jpeg",
        "PNG" => "image/png",
        _ => anyhow::bail!("unsupported file type: {}", file_name),
    };
    let u = uuid::Uuid::new_v4().to_string().to_uppercase();
    let file_name_with_uuid = u + "." + ext.as_str();
    let client = make_client().await?;
    let stored_file_abs_path = format!("{}{}", object_dir, file_name_with_uuid);
    let upload_type = UploadType::Simple(Media {
        name: Cow::from(stored_file_abs_path.clone()),
        content_type: Cow::from(content_type),
        content_length: None,
    });
    client
        .upload_object(
            &UploadObjectRequest {
                bucket: bucket(),
                ..Default::default()
            },
            data,
            &upload_type,
        )
        .await?;
    Ok(stored_file_abs_path)
}
