use crate::conf::Conf;
use crate::service::TariffService;
use crate::{Error, Result};
use actix_web::{
    dev::ServiceResponse,
    http::{
        header::{self, HeaderMap},
        StatusCode,
    },
    middleware::ErrorHandlerResponse,
    post,
    web::{Data, Json},
    HttpRequest, HttpResponseBuilder,
};
use deadpool_sqlite::Pool;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};
use strum::Display;
use tracing::{info, warn};

#[derive(Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: RpcMethod,
    pub params: Option<Value>,
    pub id: Value,
}

#[derive(Deserialize, PartialEq, Eq, Display, Clone, Copy)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RpcMethod {
    // pricing
    Quote,
    // zone
    GetZone,
    GetActiveZones,
    UpsertZone,
    DeactivateZone,
    RefreshZones,
}

#[derive(Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Value,
}

#[derive(Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

impl RpcError {
    fn parse_error(data: Option<Value>) -> Self {
        Self {
            code: -32700,
            message: "Parse error".into(),
            data,
        }
    }

    fn server_error(data: Option<Value>) -> Self {
        Self {
            code: -32000,
            message: "Server error".into(),
            data,
        }
    }
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(error),
            id: Value::Null,
        }
    }

    pub fn from<R>(id: Value, val: R) -> Result<Self>
    where
        R: Serialize,
    {
        Ok(Self::success(id, serde_json::to_value(&val)?))
    }

    fn invalid_request(id: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(RpcError {
                code: -32600,
                message: "Invalid Request".into(),
                data: None,
            }),
            id,
        }
    }
}

const PUBLIC_METHODS: &[RpcMethod] = &[
    RpcMethod::Quote,
    RpcMethod::GetZone,
    RpcMethod::GetActiveZones,
];

#[post("")]
pub async fn handle(
    req: HttpRequest,
    req_body: String,
    pool: Data<Pool>,
    conf: Data<Conf>,
    tariff: Data<TariffService>,
) -> Result<Json<RpcResponse>> {
    let headers = req.headers();
    let Ok(req) = serde_json::from_str::<Map<String, Value>>(&req_body) else {
        let error_data = json!("Request body is not a valid JSON object");
        return Ok(Json(RpcResponse::error(RpcError::parse_error(Some(
            error_data,
        )))));
    };
    let req: RpcRequest = match serde_json::from_value(Value::Object(req)) {
        Ok(val) => val,
        Err(e) => {
            let data = Value::String(e.to_string());
            let e = RpcError::parse_error(Some(data));
            return Ok(Json(RpcResponse::error(e)));
        }
    };
    if req.jsonrpc != "2.0" {
        return Ok(Json(RpcResponse::invalid_request(Value::Null)));
    }
    if !PUBLIC_METHODS.contains(&req.method)
        && !conf.is_admin(&extract_password(headers, &req.params))
    {
        warn!(method = %req.method, "Rejected unauthorized RPC call");
        return Err(Error::Unauthorized("Auth failure".into()));
    }
    info!(method = %req.method, "RPC call");
    let registry = tariff.registry();
    let res: RpcResponse = match req.method {
        RpcMethod::Quote => RpcResponse::from(
            req.id.clone(),
            super::quote::run(params(req.params)?, &tariff)?,
        ),
        RpcMethod::GetZone => RpcResponse::from(
            req.id.clone(),
            super::get_zone::run(params(req.params)?, registry)?,
        ),
        RpcMethod::GetActiveZones => RpcResponse::from(
            req.id.clone(),
            super::get_active_zones::run(registry),
        ),
        RpcMethod::UpsertZone => RpcResponse::from(
            req.id.clone(),
            super::upsert_zone::run(params(req.params)?, registry, &pool).await?,
        ),
        RpcMethod::DeactivateZone => RpcResponse::from(
            req.id.clone(),
            super::deactivate_zone::run(params(req.params)?, registry, &pool).await?,
        ),
        RpcMethod::RefreshZones => RpcResponse::from(
            req.id.clone(),
            super::refresh_zones::run(registry, &pool).await?,
        ),
    }?;
    Ok(Json(res))
}

fn params<T>(val: Option<Value>) -> Result<T>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(val.unwrap_or_default())?)
}

pub fn handle_rpc_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, res) = res.into_parts();
    let error_message = res
        .error()
        .map(|it| it.to_string())
        .unwrap_or_else(|| res.status().to_string());
    let body = RpcResponse::error(RpcError::server_error(Some(Value::String(error_message))));
    let body = serde_json::to_string(&body)?;
    let res = HttpResponseBuilder::new(StatusCode::OK).body(body);
    let res = ServiceResponse::new(req, res)
        .map_into_boxed_body()
        .map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}

fn extract_password(headers: &HeaderMap, params: &Option<Value>) -> String {
    if let Some(header) = headers.get(header::AUTHORIZATION) {
        return header
            .to_str()
            .unwrap_or_default()
            .replace("Bearer ", "");
    }
    let Some(params) = params else {
        return "".into();
    };
    let Some(password) = params.get("password") else {
        return "".into();
    };
    let Some(password) = password.as_str() else {
        return "".into();
    };
    password.into()
}

#[cfg(test)]
mod test {
    use super::RpcResponse;
    use crate::conf::Conf;
    use crate::db::test::pool;
    use crate::seed::NATIONAL_ZONE_ID;
    use crate::test::{mock_tariff_service, mock_zone};
    use crate::Result;
    use actix_web::http::StatusCode;
    use actix_web::middleware::ErrorHandlers;
    use actix_web::test::TestRequest;
    use actix_web::web::{scope, Data};
    use actix_web::{test, App};
    use serde_json::{json, Value};

    macro_rules! rpc_app {
        ($tariff:expr) => {
            test::init_service(
                App::new()
                    .app_data(Data::new(pool().await))
                    .app_data(Data::new(Conf::mock()))
                    .app_data(Data::new($tariff))
                    .service(
                        scope("/rpc")
                            .wrap(
                                ErrorHandlers::new()
                                    .default_handler_server(super::handle_rpc_error)
                                    .default_handler_client(super::handle_rpc_error),
                            )
                            .service(super::handle),
                    ),
            )
            .await
        };
    }

    #[test]
    async fn quote() -> Result<()> {
        let app = rpc_app!(mock_tariff_service());
        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(json!({
                "jsonrpc": "2.0",
                "method": "quote",
                "params": {"latitude": 18.485, "longitude": -69.934},
                "id": 1,
            }))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        assert!(res.error.is_none());
        let result = res.result.unwrap();
        assert_eq!(json!(NATIONAL_ZONE_ID), result["zone_id"]);
        assert_eq!(Value::Bool(true), result["covered_by_polygon"]);
        let total_cost = result["total_cost"].as_f64().unwrap();
        assert!((total_cost - 4.11).abs() < 0.01);
        Ok(())
    }

    #[test]
    async fn get_zone_not_found_is_rpc_error() -> Result<()> {
        let app = rpc_app!(mock_tariff_service());
        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(json!({
                "jsonrpc": "2.0",
                "method": "get_zone",
                "params": {"id": 404},
                "id": 1,
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::OK, res.status());
        let res: RpcResponse = test::read_body_json(res).await;
        assert_eq!(-32000, res.error.unwrap().code);
        Ok(())
    }

    #[test]
    async fn admin_method_requires_token() -> Result<()> {
        let app = rpc_app!(mock_tariff_service());
        let body = json!({
            "jsonrpc": "2.0",
            "method": "upsert_zone",
            "params": {"zone": mock_zone(2)},
            "id": 1,
        });
        let req = TestRequest::post().uri("/rpc").set_json(&body).to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        assert!(res.error.is_some());
        let req = TestRequest::post()
            .uri("/rpc")
            .append_header(("Authorization", "Bearer admin"))
            .set_json(&body)
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        assert!(res.error.is_none());
        assert_eq!(json!(2), res.result.unwrap()["id"]);
        Ok(())
    }

    #[test]
    async fn invalid_zone_is_rejected() -> Result<()> {
        let app = rpc_app!(mock_tariff_service());
        let mut zone = mock_zone(2);
        zone.polygon.pop();
        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(json!({
                "jsonrpc": "2.0",
                "method": "upsert_zone",
                "params": {"zone": zone, "password": "admin"},
                "id": 1,
            }))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        let error = res.error.unwrap();
        assert!(error.data.unwrap().as_str().unwrap().contains("Invalid zone config"));
        Ok(())
    }

    #[test]
    async fn malformed_requests() -> Result<()> {
        let app = rpc_app!(mock_tariff_service());
        let req = TestRequest::post()
            .uri("/rpc")
            .set_payload("not json")
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(-32700, res.error.unwrap().code);
        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(json!({"jsonrpc": "1.0", "method": "quote", "id": 1}))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(-32600, res.error.unwrap().code);
        let req = TestRequest::post()
            .uri("/rpc")
            .set_json(json!({"jsonrpc": "2.0", "method": "drop_tables", "id": 1}))
            .to_request();
        let res: RpcResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(-32700, res.error.unwrap().code);
        Ok(())
    }
}
