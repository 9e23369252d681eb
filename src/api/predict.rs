//! Scoring endpoints

use actix_web::{post, web, HttpResponse};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::models::ScoringService;
use crate::types::{ApplicantRecord, RiskResult};

/// Largest number of records accepted by `/predict/batch`
#[derive(Debug, Clone, Copy)]
pub struct BatchLimit(pub usize);

/// Per-record outcome in a batch response
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Scored(RiskResult),
    Rejected { error: String, message: String },
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<BatchItem>,
}

/// Score a single applicant
#[post("/predict")]
pub async fn predict(
    service: web::Data<ScoringService>,
    record: web::Json<ApplicantRecord>,
) -> Result<HttpResponse, ApiError> {
    let record = record.into_inner();
    // The classifier call may block on the model session
    let result = web::block(move || service.score(&record))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(result))
}

/// Score several applicants; one bad record does not fail the batch
#[post("/predict/batch")]
pub async fn predict_batch(
    service: web::Data<ScoringService>,
    limit: web::Data<BatchLimit>,
    records: web::Json<Vec<ApplicantRecord>>,
) -> Result<HttpResponse, ApiError> {
    if records.len() > limit.0 {
        return Err(ApiError::BadRequest(format!(
            "batch of {} records exceeds the limit of {}",
            records.len(),
            limit.0
        )));
    }

    let records = records.into_inner();
    let outcomes = web::block(move || service.score_batch(&records))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let results = outcomes
        .into_iter()
        .map(|outcome| match outcome {
            Ok(result) => BatchItem::Scored(result),
            Err(err) => {
                let err = ApiError::from(err);
                tracing::warn!(error_type = err.error_type(), message = %err, "Batch record rejected");
                BatchItem::Rejected {
                    error: err.error_type().to_string(),
                    message: err.to_string(),
                }
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(BatchResponse { results }))
}

/// Configure scoring routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(predict).service(predict_batch);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inference::tests::{applicant, stub_service};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    fn body() -> Value {
        json!({
            "age": 30,
            "income": 50000.0,
            "home_ownership": "RENT",
            "emp_length": 5,
            "loan_intent": "EDUCATION",
            "loan_grade": "B",
            "loan_amnt": 10000.0,
            "loan_int_rate": 11.5,
            "default_on_file": "N",
            "cred_hist_length": 4
        })
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(stub_service()))
                    .app_data(web::Data::new(BatchLimit(3)))
                    .configure(crate::api::configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_predict() {
        let app = app!();

        let req = test::TestRequest::post().uri("/predict").set_json(body()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["risk_level"], "low");
        assert!((json["risk_score"].as_f64().unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_predict_matches_direct_scoring() {
        let app = app!();
        let expected = serde_json::to_value(stub_service().score(&applicant()).unwrap()).unwrap();

        for _ in 0..4 {
            let req = test::TestRequest::post().uri("/predict").set_json(body()).to_request();
            let json: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(json, expected);
        }

        let req = test::TestRequest::post()
            .uri("/predict/batch")
            .set_json(json!([body(), body()]))
            .to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["results"], json!([expected.clone(), expected]));
    }

    #[actix_web::test]
    async fn test_predict_unknown_category() {
        let app = app!();
        let mut payload = body();
        payload["loan_intent"] = json!("VACATION");

        let req = test::TestRequest::post().uri("/predict").set_json(payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "unknown_category");
        assert!(json["message"].as_str().unwrap().contains("VACATION"));
        assert!(json["request_id"].is_string());
    }

    #[actix_web::test]
    async fn test_predict_missing_field() {
        let app = app!();
        let mut payload = body();
        payload.as_object_mut().unwrap().remove("loan_grade");

        let req = test::TestRequest::post().uri("/predict").set_json(payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "bad_request");
    }

    #[actix_web::test]
    async fn test_predict_batch_preserves_order() {
        let app = app!();
        let mut risky = body();
        risky["income"] = json!(12500.0);
        let mut unknown = body();
        unknown["home_ownership"] = json!("CASTLE");

        let req = test::TestRequest::post()
            .uri("/predict/batch")
            .set_json(json!([body(), unknown, risky]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let json: Value = test::read_body_json(resp).await;
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["risk_level"], "low");
        assert_eq!(results[1]["error"], "unknown_category");
        assert_eq!(results[2]["risk_level"], "high");
    }

    #[actix_web::test]
    async fn test_predict_batch_over_limit() {
        let app = app!();

        let req = test::TestRequest::post()
            .uri("/predict/batch")
            .set_json(json!([body(), body(), body(), body()]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
