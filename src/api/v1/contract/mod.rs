mod complete;
mod get;
mod get_active;
mod upload_return_photo;

use warp::Filter;

pub fn api_v1_contract()
-> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("contract")
        .and(
            get_active::main()
                .or(get::main())
                .or(upload_return_photo::main())
                .or(complete::main()),
        )
        .and(warp::path::end())
}
