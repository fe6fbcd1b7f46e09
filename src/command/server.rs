use crate::conf::Conf;
use crate::error::query_error_handler;
use crate::service::{self, TariffService};
use crate::zone::ZoneRegistry;
use crate::{rest, rpc, Result};
use actix_web::dev::Service;
use actix_web::middleware::ErrorHandlers;
use actix_web::web::{scope, QueryConfig};
use actix_web::{
    middleware::{Compress, NormalizePath},
    web::Data,
    App, HttpServer,
};
use deadpool_sqlite::Pool;
use futures_util::future::FutureExt;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, warn};

pub async fn run(conf: Conf, pool: Pool) -> Result<()> {
    let registry = Arc::new(ZoneRegistry::new());
    let loaded = service::zone::refresh(&registry, &pool).await?;
    let snapshot = registry.snapshot();
    if snapshot.is_empty() {
        warn!("No zones loaded, every quote will be uncovered until zones are added");
    }
    info!(loaded, zones = snapshot.len(), version = snapshot.version(), "Zone registry ready");
    let bind = (conf.bind_addr.clone(), conf.port);
    if conf.admin_token.is_none() {
        info!("Admin token is not set, admin RPC methods are disabled");
    }
    let pool = Data::new(pool);
    let conf = Data::new(conf);
    let tariff = Data::new(TariffService::new(registry));
    info!(addr = %bind.0, port = bind.1, "Starting server");
    HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let req_query_string = req.query_string().to_string();
                let req_method = req.method().as_str().to_string();
                let req_path = req.path().to_string();
                let req_time = OffsetDateTime::now_utc();
                let req_real_ip = req
                    .connection_info()
                    .realip_remote_addr()
                    .unwrap_or_default()
                    .to_string();
                srv.call(req).map(move |res| {
                    if let Ok(res) = res.as_ref() {
                        let res_status = res.status().as_u16();
                        info!(
                            req_query_string,
                            req_method,
                            req_path,
                            req_real_ip,
                            res_status,
                            res_time_sec = (OffsetDateTime::now_utc() - req_time).as_seconds_f64(),
                        );
                    }
                    res
                })
            })
            .wrap(NormalizePath::trim())
            .wrap(Compress::default())
            .app_data(pool.clone())
            .app_data(conf.clone())
            .app_data(tariff.clone())
            .app_data(QueryConfig::default().error_handler(query_error_handler))
            .service(
                scope("rpc")
                    .wrap(
                        ErrorHandlers::new()
                            .default_handler_server(rpc::handler::handle_rpc_error)
                            .default_handler_client(rpc::handler::handle_rpc_error),
                    )
                    .service(rpc::handler::handle),
            )
            .service(
                scope("v1")
                    .service(scope("quote").service(rest::v1::quote::get))
                    .service(
                        scope("zones")
                            .service(rest::v1::zones::get)
                            .service(rest::v1::zones::get_by_id),
                    ),
            )
    })
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}
