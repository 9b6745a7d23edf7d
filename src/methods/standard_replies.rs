use crate::{helper_model, integration};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

pub fn bad_request(err_msg: &str) -> Result<(warp::reply::Response,), Rejection> {
    let msg: helper_model::ErrorResponse = helper_model::ErrorResponse {
        title: String::from("Bad Request"),
        message: err_msg.to_string(),
    };
    Ok::<_, Rejection>((warp::reply::with_status(
        warp::reply::json(&msg),
        StatusCode::BAD_REQUEST,
    )
    .into_response(),))
}

pub fn internal_server_error_response(msg: String) -> Result<(warp::reply::Response,), Rejection> {
    tokio::spawn(async move {
        let _ = integration::sendgrid_ops::send_email(
            Option::from("RentDesk Server"),
            integration::sendgrid_ops::ops_inbox(),
            "Internal Server Error",
            &msg,
            None,
        )
        .await;
    });
    let msg: helper_model::ErrorResponse = helper_model::ErrorResponse {
        title: String::from("Internal Server Error"),
        message: String::from("Please try again later. If issue present, contact ops@rentdesk.rent "),
    };
    Ok::<_, Rejection>((warp::reply::with_status(
        warp::reply::json(&msg),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .into_response(),))
}

pub fn method_not_allowed_response() -> Result<(warp::reply::Response,), Rejection> {
    let msg: helper_model::ErrorResponse = helper_model::ErrorResponse {
        title: String::from("Method Not Allowed"),
        message: String::from("This endpoint does not support the request method. "),
    };
    Ok((warp::reply::with_status(
        warp::reply::json(&msg),
        StatusCode::METHOD_NOT_ALLOWED,
    )
    .into_response(),))
}

pub fn contract_not_found_response(contract: i32) -> Result<(warp::reply::Response,), Rejection> {
    let msg_txt = "Contract ".to_owned() + &contract.to_string() + " does not exist.";
    let msg: helper_model::ErrorResponse = helper_model::ErrorResponse {
        title: String::from("Contract Not Found"),
        message: msg_txt,
    };
    Ok((warp::reply::with_status(warp::reply::json(&msg), StatusCode::NOT_FOUND).into_response(),))
}

pub fn contract_not_active_response(contract: i32) -> Result<(warp::reply::Response,), Rejection> {
    let msg_txt = "Contract ".to_owned()
        + &contract.to_string()
        + " is not active; a return can only be recorded once.";
    let msg: helper_model::ErrorResponse = helper_model::ErrorResponse {
        title: String::from("Return Not Allowed"),
        message: msg_txt,
    };
    Ok((warp::reply::with_status(warp::reply::json(&msg), StatusCode::CONFLICT).into_response(),))
}

pub fn validation_failed_response(
    blocks: &[crate::methods::return_flow::CommitBlock],
) -> Result<(warp::reply::Response,), Rejection> {
    let message = blocks
        .iter()
        .map(|b| b.message())
        .collect::<Vec<_>>()
        .join(" ");
    let msg: helper_model::ErrorResponse = helper_model::ErrorResponse {
        title: String::from("Return Incomplete"),
        message,
    };
    Ok((warp::reply::with_status(
        warp::reply::json(&msg),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .into_response(),))
}

pub fn response_with_obj<T>(
    obj: T,
    status_code: StatusCode,
) -> Result<(warp::reply::Response,), Rejection>
where
    T: serde::Serialize,
{
    Ok((warp::reply::with_status(warp::reply::json(&obj), status_code).into_response(),))
}
