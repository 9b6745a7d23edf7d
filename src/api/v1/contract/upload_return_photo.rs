use crate::{helper_model, integration, methods};
use bytes::BufMut;
use futures::TryStreamExt;
use warp::Filter;
use warp::http::StatusCode;
use warp::multipart::FormData;

pub fn main() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("upload-return-photo")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::multipart::form().max_length(5 * 1024 * 1024))
        .and_then(async move |form: FormData| {
            let fields: Result<Vec<(String, Vec<u8>)>, _> = form
                .and_then(|mut field| async move {
                    let mut bytes: Vec<u8> = Vec::new();

                    // field.data() only returns a piece of the content, you should call over it until it replies None
                    while let Some(content) = field.data().await {
                        let content = content?;
                        bytes.put(content);
                    }
                    let file_name = field.filename().unwrap_or("photo.jpg").to_string();
                    Ok((file_name, bytes))
                })
                .try_collect()
                .await;

            let Ok(fields) = fields else {
                return methods::standard_replies::bad_request("Malformed multipart form. ");
            };
            if fields.len() != 1 {
                return methods::standard_replies::bad_request("Please upload exactly one file. ");
            }
            let (file_name, data) = fields.into_iter().next().unwrap();

            match integration::gcloud_storage::upload_file(
                "return_photos/".to_string(),
                file_name,
                data,
            )
            .await
            {
                Ok(file_path) => methods::standard_replies::response_with_obj(
                    helper_model::FilePath { file_path },
                    StatusCode::CREATED,
                ),
                Err(e) => {
                    eprintln!("contract/upload-return-photo: {:?}", e);
                    methods::standard_replies::bad_request(
                        "The photo could not be stored. Only JPG and PNG files are accepted. ",
                    )
                }
            }
        })
}
