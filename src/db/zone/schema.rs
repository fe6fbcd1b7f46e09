use crate::geometry::Coordinate;
use crate::zone::{TariffBand, Zone};
use crate::{Error, Result};
use geojson::{Feature, GeoJson, Geometry, Value};
use rusqlite::types::Type;
use rusqlite::Row;
use time::OffsetDateTime;

pub const TABLE_NAME: &str = "zone";

pub enum Columns {
    Id,
    Name,
    Description,
    Color,
    Active,
    Polygon,
    CentroidLat,
    CentroidLon,
    CoverageRadiusKm,
    TariffBands,
    CreatedAt,
    UpdatedAt,
}

impl Columns {
    pub fn as_str(&self) -> &'static str {
        match self {
            Columns::Id => "id",
            Columns::Name => "name",
            Columns::Description => "description",
            Columns::Color => "color",
            Columns::Active => "active",
            Columns::Polygon => "polygon",
            Columns::CentroidLat => "centroid_lat",
            Columns::CentroidLon => "centroid_lon",
            Columns::CoverageRadiusKm => "coverage_radius_km",
            Columns::TariffBands => "tariff_bands",
            Columns::CreatedAt => "created_at",
            Columns::UpdatedAt => "updated_at",
        }
    }
}

/// A persisted zone definition. Rows are not validated on read, the registry
/// does that when it loads them.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRecord {
    pub zone: Zone,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl ZoneRecord {
    pub fn projection() -> String {
        [
            Columns::Id,
            Columns::Name,
            Columns::Description,
            Columns::Color,
            Columns::Active,
            Columns::Polygon,
            Columns::CentroidLat,
            Columns::CentroidLon,
            Columns::CoverageRadiusKm,
            Columns::TariffBands,
            Columns::CreatedAt,
            Columns::UpdatedAt,
        ]
        .iter()
        .map(Columns::as_str)
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn mapper() -> fn(&Row) -> rusqlite::Result<ZoneRecord> {
        |row: &Row| -> rusqlite::Result<ZoneRecord> {
            let polygon: String = row.get(5)?;
            let polygon = polygon_from_geo_json(&polygon)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.to_string().into())
                })?;
            let tariff_bands: String = row.get(9)?;
            let tariff_bands: Vec<TariffBand> = serde_json::from_str(&tariff_bands)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;
            Ok(ZoneRecord {
                zone: Zone {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    color: row.get(3)?,
                    active: row.get(4)?,
                    polygon,
                    centroid: Coordinate::new(row.get(6)?, row.get(7)?),
                    coverage_radius_km: row.get(8)?,
                    tariff_bands,
                },
                created_at: row.get(10)?,
                updated_at: row.get(11)?,
            })
        }
    }
}

/// Ring as a GeoJSON Polygon geometry, positions are [lon, lat]
pub fn polygon_to_geo_json(ring: &[Coordinate]) -> Result<String> {
    let positions = ring
        .iter()
        .map(|it| vec![it.longitude, it.latitude])
        .collect();
    let geometry = Geometry::new(Value::Polygon(vec![positions]));
    Ok(serde_json::to_string(&geometry)?)
}

pub fn polygon_from_geo_json(geo_json: &str) -> Result<Vec<Coordinate>> {
    let geometry = match geo_json.parse::<GeoJson>()? {
        GeoJson::Geometry(it) => it,
        GeoJson::Feature(Feature {
            geometry: Some(it), ..
        }) => it,
        _ => {
            return Err(Error::InvalidZoneConfig(
                "zone geo_json has no geometry".into(),
            ))
        }
    };
    let Value::Polygon(rings) = geometry.value else {
        return Err(Error::InvalidZoneConfig(
            "zone geometry is not a polygon".into(),
        ));
    };
    let Some(exterior) = rings.into_iter().next() else {
        return Err(Error::InvalidZoneConfig("zone polygon has no rings".into()));
    };
    exterior
        .into_iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(Coordinate::new(*lat, *lon)),
            _ => Err(Error::InvalidZoneConfig(
                "zone polygon has a position without coordinates".into(),
            )),
        })
        .collect()
}
