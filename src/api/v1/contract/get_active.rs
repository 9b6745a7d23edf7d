use crate::{POOL, helper_model, methods, model};
use diesel::prelude::*;
use warp::http::{Method, StatusCode};
use warp::{Filter, Rejection, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("get-active")
        .and(warp::path::end())
        .and(warp::method())
        .and_then(async move |method: Method| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }

            use crate::schema::contracts::dsl as contract_q;
            use crate::schema::customers::dsl as customer_q;
            use crate::schema::vehicles::dsl as vehicle_q;
            let mut pool = match POOL.get() {
                Ok(conn) => conn,
                Err(e) => {
                    return methods::standard_replies::internal_server_error_response(format!(
                        "contract/get-active: pool unavailable: {:?}",
                        e
                    ));
                }
            };
            let rows = contract_q::contracts
                .inner_join(customer_q::customers)
                .inner_join(vehicle_q::vehicles)
                .filter(contract_q::status.eq(model::ContractStatus::Active))
                .order(contract_q::end_time.asc())
                .get_results::<(model::Contract, model::Customer, model::Vehicle)>(&mut pool);

            match rows {
                Ok(rows) => {
                    let active: Vec<helper_model::ActiveContract> = rows
                        .into_iter()
                        .map(|(contract, customer, vehicle)| helper_model::ActiveContract {
                            contract,
                            customer,
                            vehicle,
                        })
                        .collect();
                    methods::standard_replies::response_with_obj(active, StatusCode::OK)
                }
                Err(e) => methods::standard_replies::internal_server_error_response(format!(
                    "contract/get-active: {:?}",
                    e
                )),
            }
        })
}
