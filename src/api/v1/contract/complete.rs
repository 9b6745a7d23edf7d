use crate::methods::damage::{DamagePatch, DamagePoint};
use crate::methods::return_flow::{
    self, Action, CommitStep, FailurePolicy, Part, ReturnFlowState, reduce,
};
use crate::methods::settlement::ChargeField;
use crate::{POOL, helper_model, integration, methods, model};
use currency_rs::Currency;
use diesel::prelude::*;
use warp::http::{Method, StatusCode};
use warp::{Filter, Rejection, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("complete")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and_then(
            async move |method: Method, body: helper_model::CompleteContractRequest| {
                if method != Method::POST {
                    return methods::standard_replies::method_not_allowed_response();
                }

                if body.contract_id <= 0 {
                    return methods::standard_replies::bad_request(
                        "Bad request: wrong parameters. ",
                    );
                }

                let return_time =
                    match methods::timestamps::local_to_utc(&body.return_time, &body.time_zone) {
                        Ok(t) => t,
                        Err(e) => {
                            return methods::standard_replies::bad_request(&format!(
                                "Unreadable return time: {} ",
                                e
                            ));
                        }
                    };

                // One read of the contract row; the completion update below is
                // the only write, guarded by the Active status filter.
                use crate::schema::contracts::dsl as contract_q;
                use crate::schema::customers::dsl as customer_q;
                use crate::schema::vehicles::dsl as vehicle_q;
                let mut pool = match POOL.get() {
                    Ok(conn) => conn,
                    Err(e) => {
                        return methods::standard_replies::internal_server_error_response(format!(
                            "contract/complete: pool unavailable: {:?}",
                            e
                        ));
                    }
                };
                let contract_row = contract_q::contracts
                    .inner_join(customer_q::customers)
                    .inner_join(vehicle_q::vehicles)
                    .filter(contract_q::id.eq(&body.contract_id))
                    .get_result::<(model::Contract, model::Customer, model::Vehicle)>(&mut pool);

                let (contract, customer, vehicle) = match contract_row {
                    Ok(row) => row,
                    Err(diesel::result::Error::NotFound) => {
                        return methods::standard_replies::contract_not_found_response(
                            body.contract_id,
                        );
                    }
                    Err(e) => {
                        return methods::standard_replies::internal_server_error_response(format!(
                            "contract/complete: {:?}",
                            e
                        ));
                    }
                };
                if contract.status != model::ContractStatus::Active {
                    return methods::standard_replies::contract_not_active_response(contract.id);
                }
                if let Some(odometer) = body.odometer
                    && odometer < contract.pickup_odometer
                {
                    return methods::standard_replies::bad_request(
                        "The return odometer reading cannot be below the pickup reading. ",
                    );
                }

                // Replay the wizard through the reducer so the same guards the
                // UI saw gate the commit here.
                let snapshot = return_flow::ContractSnapshot::from(&contract);
                let mut state = ReturnFlowState::default();
                state = reduce(state, Action::SelectContract(snapshot.clone()));
                state = reduce(state, Action::SetReturnTime(return_time));
                state = reduce(state, Action::SetOdometer(body.odometer));
                state = reduce(state, Action::SetFuelLevel(body.fuel_level));
                state = reduce(state, Action::SetInspectorName(body.inspector_name.clone()));
                state = reduce(state, Action::Next);
                state = reduce(
                    state,
                    Action::SetCondition(Part::Exterior, body.exterior_condition),
                );
                state = reduce(
                    state,
                    Action::SetCondition(Part::Interior, body.interior_condition),
                );
                state = reduce(state, Action::SetCondition(Part::Tires, body.tires_condition));
                state = reduce(
                    state,
                    Action::SetCondition(Part::Lights, body.lights_condition),
                );
                for damage in &body.damages {
                    state = reduce(
                        state,
                        Action::AddDamage(DamagePoint {
                            view: damage.view,
                            x: damage.x,
                            y: damage.y,
                            severity: damage.severity,
                        }),
                    );
                    let id = state.damages.entries().last().unwrap().id;
                    state = reduce(
                        state,
                        Action::UpdateDamage {
                            id,
                            patch: DamagePatch {
                                severity: None,
                                description: Some(damage.description.clone()),
                                estimated_cost: Some(damage.estimated_cost),
                                photo_paths: Some(damage.photo_paths.clone()),
                            },
                        },
                    );
                }
                if let Some(amount) = body.late_fee_override {
                    state = reduce(state, Action::SetLateFee(ChargeField::Manual(amount)));
                }
                if let Some(amount) = body.fuel_charge_override {
                    state = reduce(state, Action::SetFuelCharge(ChargeField::Manual(amount)));
                }
                if let Some(amount) = body.mileage_charge_override {
                    state = reduce(state, Action::SetMileageCharge(ChargeField::Manual(amount)));
                }
                state = reduce(state, Action::SetDamageFee(body.damage_fee));
                state = reduce(state, Action::SetCleaningFee(body.cleaning_fee));
                state = reduce(state, Action::Next);
                state = reduce(state, Action::SetAcknowledged(body.customer_acknowledged));
                if let Some(notes) = body.notes.clone() {
                    state = reduce(state, Action::SetNotes(notes));
                }

                // Validation failures stop everything before the first network
                // call.
                if let Err(blocks) = return_flow::validate_commit(&state) {
                    return methods::standard_replies::validation_failed_response(&blocks);
                }
                let Some(view) = return_flow::settlement_view(&state) else {
                    return methods::standard_replies::internal_server_error_response(String::from(
                        "contract/complete: settlement unavailable after validation",
                    ));
                };

                let mut notices: Vec<helper_model::Notice> = Vec::new();

                // Step 1 of 3: photo paths -> public URLs. Recoverable; the
                // return proceeds without photos on failure.
                let mut photo_urls: Vec<Vec<String>> = Vec::new();
                let mut photo_failures = 0;
                for entry in state.damages.entries() {
                    let mut urls = Vec::new();
                    for path in entry.photo_paths.iter().take(4) {
                        match integration::gcloud_storage::get_signed_url(path).await {
                            Ok(url) => urls.push(url),
                            Err(e) => {
                                eprintln!("contract/complete: photo url for {}: {:?}", path, e);
                                photo_failures += 1;
                            }
                        }
                    }
                    photo_urls.push(urls);
                }
                let dropped_photos = state.damages.excess_photo_references();
                if dropped_photos > 0 {
                    notices.push(helper_model::Notice::warning(
                        "Extra Photos Skipped",
                        format!(
                            "{} photo(s) beyond the four stored per damage were left off the record.",
                            dropped_photos
                        ),
                    ));
                }
                if photo_failures > 0 {
                    match return_flow::failure_policy(CommitStep::ResolvePhotos) {
                        FailurePolicy::Fatal => {
                            return methods::standard_replies::internal_server_error_response(
                                format!(
                                    "contract/complete: {} photo(s) unresolvable for contract {}",
                                    photo_failures, contract.id
                                ),
                            );
                        }
                        FailurePolicy::Recoverable => {
                            notices.push(helper_model::Notice::warning(
                                "Photos Unavailable",
                                format!(
                                    "{} photo(s) could not be attached; the return was recorded without them.",
                                    photo_failures
                                ),
                            ));
                        }
                    }
                }

                // Step 2 of 3: the persistence write. Fatal on failure; the
                // contract stays active and the clerk can retry.
                let confirmation = methods::confirmation::generate_unique_return_confirmation();
                let odometer = return_flow::effective_odometer(&state, &snapshot);
                let fuel_level = return_flow::effective_fuel_level(&state, &snapshot);
                let new_record = model::NewReturnRecord {
                    confirmation: confirmation.clone(),
                    contract_id: contract.id,
                    return_time,
                    odometer,
                    fuel_level,
                    inspector_name: state.inspector_name.clone(),
                    customer_acknowledged: state.customer_acknowledged,
                    exterior_condition: state.exterior_condition,
                    interior_condition: state.interior_condition,
                    tires_condition: state.tires_condition,
                    lights_condition: state.lights_condition,
                    late_fee: view.charges.late_fee,
                    fuel_charge: view.charges.fuel_charge,
                    damage_fee: view.charges.damage_fee,
                    cleaning_fee: view.charges.cleaning_fee,
                    other_charge: view.charges.other,
                    damage_total: view.damage_total,
                    deposit_held: snapshot.deposit,
                    settlement_amount: view.settlement.signed(),
                    notes: if state.notes.trim().is_empty() {
                        None
                    } else {
                        Some(state.notes.clone())
                    },
                    document_link: None,
                };

                let persisted = pool.transaction::<model::ReturnRecord, diesel::result::Error, _>(
                    |conn| {
                        // second concurrent commit loses here: zero rows match
                        let flipped = diesel::update(
                            contract_q::contracts
                                .filter(contract_q::id.eq(&contract.id))
                                .filter(contract_q::status.eq(model::ContractStatus::Active)),
                        )
                        .set((
                            contract_q::status.eq(model::ContractStatus::Completed),
                            contract_q::actual_return_time.eq(Some(return_time)),
                            contract_q::return_odometer.eq(Some(odometer)),
                            contract_q::return_fuel_level.eq(Some(fuel_level)),
                        ))
                        .execute(conn)?;
                        if flipped == 0 {
                            return Err(diesel::result::Error::NotFound);
                        }

                        use crate::schema::return_damages::dsl as damage_q;
                        use crate::schema::return_records::dsl as record_q;
                        let record = diesel::insert_into(record_q::return_records)
                            .values(&new_record)
                            .get_result::<model::ReturnRecord>(conn)?;

                        for (entry, urls) in state.damages.entries().iter().zip(photo_urls.iter()) {
                            let new_damage = model::NewReturnDamage {
                                return_record_id: record.id,
                                view: entry.view,
                                coordination_x_percentage: entry.x,
                                coordination_y_percentage: entry.y,
                                severity: entry.severity,
                                description: entry.description.clone(),
                                estimated_cost: entry.estimated_cost,
                                first_image: urls.first().cloned(),
                                second_image: urls.get(1).cloned(),
                                third_image: urls.get(2).cloned(),
                                fourth_image: urls.get(3).cloned(),
                            };
                            diesel::insert_into(damage_q::return_damages)
                                .values(&new_damage)
                                .execute(conn)?;
                        }

                        // release the vehicle and sync its readings
                        diesel::update(vehicle_q::vehicles.find(&contract.vehicle_id))
                            .set((
                                vehicle_q::available.eq(true),
                                vehicle_q::odometer.eq(odometer),
                                vehicle_q::tank_level_percentage.eq(fuel_level),
                            ))
                            .execute(conn)?;

                        Ok(record)
                    },
                );

                let mut record = match persisted {
                    Ok(record) => record,
                    Err(diesel::result::Error::NotFound) => {
                        return methods::standard_replies::contract_not_active_response(contract.id);
                    }
                    Err(e) => {
                        // failure_policy(Persist) is Fatal: abort, nothing
                        // was written, the clerk can retry
                        return methods::standard_replies::internal_server_error_response(format!(
                            "contract/complete: persist failed for contract {}: {:?}",
                            contract.id, e
                        ));
                    }
                };

                // Step 3 of 3: the return document. Recoverable; a failure
                // after the write is a warning, never a rollback.
                let payload = serde_json::json!({
                    "confirmation": record.confirmation,
                    "contract_confirmation": contract.confirmation,
                    "customer_name": customer.name,
                    "vehicle": format!("{} {} {}", vehicle.year, vehicle.make, vehicle.model),
                    "license": format!("{} {}", vehicle.license_state, vehicle.license_number),
                    "return_time": return_time.to_rfc3339(),
                    "inspector_name": record.inspector_name,
                    "charges": {
                        "late_fee": Currency::new_float(view.charges.late_fee, None).format(),
                        "fuel_charge": Currency::new_float(view.charges.fuel_charge, None).format(),
                        "damage_fee": Currency::new_float(view.charges.damage_fee, None).format(),
                        "cleaning_fee": Currency::new_float(view.charges.cleaning_fee, None).format(),
                        "mileage_charge": Currency::new_float(view.charges.other, None).format(),
                        "damage_total": Currency::new_float(view.damage_total, None).format(),
                    },
                    "deposit_held": Currency::new_float(snapshot.deposit, None).format(),
                    "total_deductions": Currency::new_float(view.total_deductions, None).format(),
                    "settlement_amount": Currency::new_float(view.settlement.amount(), None).format(),
                    "settlement_is_refund": view.settlement.signed() >= 0.0,
                    "damage_photos": photo_urls,
                });
                let file_name = format!("return_{}.pdf", record.confirmation);
                match integration::docgen::generate_return_document(contract.id, file_name, payload)
                    .await
                {
                    Ok(link) => {
                        use crate::schema::return_records::dsl as record_q;
                        let updated = diesel::update(record_q::return_records.find(&record.id))
                            .set(record_q::document_link.eq(Some(link.clone())))
                            .get_result::<model::ReturnRecord>(&mut pool);
                        match updated {
                            Ok(updated) => record = updated,
                            Err(e) => {
                                eprintln!(
                                    "contract/complete: document link not saved for return {}: {:?}",
                                    record.id, e
                                );
                                record.document_link = Some(link);
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!(
                            "contract/complete: document generation for return {}: {:?}",
                            record.id, e
                        );
                        match return_flow::failure_policy(CommitStep::GenerateDocument) {
                            // the write already succeeded; never roll it back
                            FailurePolicy::Recoverable => {
                                notices.push(helper_model::Notice::warning(
                                    "Document Not Generated",
                                    String::from(
                                        "The return was completed, but the PDF could not be generated. It can be re-issued later.",
                                    ),
                                ));
                            }
                            FailurePolicy::Fatal => {
                                return methods::standard_replies::internal_server_error_response(
                                    format!(
                                        "contract/complete: document generation fatal for return {}",
                                        record.id
                                    ),
                                );
                            }
                        }
                    }
                }

                notices.insert(
                    0,
                    helper_model::Notice::success(
                        "Return Completed",
                        format!(
                            "Contract {} settled: {}.",
                            contract.confirmation,
                            match view.settlement.signed() >= 0.0 {
                                true => format!(
                                    "refund of {}",
                                    Currency::new_float(view.settlement.amount(), None).format()
                                ),
                                false => format!(
                                    "{} due from the customer",
                                    Currency::new_float(view.settlement.amount(), None).format()
                                ),
                            }
                        ),
                    ),
                );

                methods::standard_replies::response_with_obj(
                    helper_model::CompletedReturn {
                        return_record: record,
                        notices,
                    },
                    StatusCode::CREATED,
                )
            },
        )
}
