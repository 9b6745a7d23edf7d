use crate::{POOL, helper_model, methods, model};
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::http::{Method, StatusCode};
use warp::{Filter, Rejection, Reply};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
struct ContractQuery {
    id: i32,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("get")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::query::<ContractQuery>())
        .and_then(async move |method: Method, query: ContractQuery| {
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
                        "contract/get: pool unavailable: {:?}",
                        e
                    ));
                }
            };
            let row = contract_q::contracts
                .inner_join(customer_q::customers)
                .inner_join(vehicle_q::vehicles)
                .filter(contract_q::id.eq(&query.id))
                .get_result::<(model::Contract, model::Customer, model::Vehicle)>(&mut pool);

            match row {
                Ok((contract, customer, vehicle)) => methods::standard_replies::response_with_obj(
                    helper_model::ActiveContract {
                        contract,
                        customer,
                        vehicle,
                    },
                    StatusCode::OK,
                ),
                Err(diesel::result::Error::NotFound) => {
                    methods::standard_replies::contract_not_found_response(query.id)
                }
                Err(e) => methods::standard_replies::internal_server_error_response(format!(
                    "contract/get: {:?}",
                    e
                )),
            }
        })
}
