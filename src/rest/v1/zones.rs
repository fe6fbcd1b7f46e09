use crate::db;
use crate::db::zone::schema::ZoneRecord;
use crate::zone::Zone;
use crate::Error;
use actix_web::get;
use actix_web::web::Data;
use actix_web::web::Json;
use actix_web::web::Path;
use actix_web::web::Query;
use deadpool_sqlite::Pool;
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Deserialize)]
pub struct GetArgs {
    #[serde(default)]
    #[serde(with = "time::serde::rfc3339::option")]
    updated_since: Option<OffsetDateTime>,
    #[serde(default)]
    include_inactive: bool,
    limit: Option<i64>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
pub struct GetItem {
    #[serde(flatten)]
    pub zone: Zone,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ZoneRecord> for GetItem {
    fn from(val: ZoneRecord) -> Self {
        GetItem {
            zone: val.zone,
            created_at: val.created_at,
            updated_at: val.updated_at,
        }
    }
}

#[get("")]
pub async fn get(args: Query<GetArgs>, pool: Data<Pool>) -> Result<Json<Vec<GetItem>>, Error> {
    let zones = db::zone::queries::select(
        args.updated_since,
        args.include_inactive,
        args.limit,
        &pool,
    )
    .await?;
    Ok(Json(zones.into_iter().map(Into::into).collect()))
}

#[get("{id}")]
pub async fn get_by_id(id: Path<i64>, pool: Data<Pool>) -> Result<Json<GetItem>, Error> {
    db::zone::queries::select_by_id(id.into_inner(), &pool)
        .await
        .map(|it| Json(it.into()))
}
