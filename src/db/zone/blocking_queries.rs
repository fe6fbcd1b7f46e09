use super::schema::{self, polygon_to_geo_json, Columns, ZoneRecord};
use crate::zone::Zone;
use crate::{Error, Result};
use rusqlite::{named_params, Connection, OptionalExtension};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

pub fn upsert(zone: &Zone, conn: &Connection) -> Result<ZoneRecord> {
    let sql = format!(
        r#"
            INSERT INTO {table} (
                {id},
                {name},
                {description},
                {color},
                {active},
                {polygon},
                {centroid_lat},
                {centroid_lon},
                {coverage_radius_km},
                {tariff_bands}
            ) VALUES (
                :id,
                :name,
                :description,
                :color,
                :active,
                :polygon,
                :centroid_lat,
                :centroid_lon,
                :coverage_radius_km,
                json(:tariff_bands)
            )
            ON CONFLICT ({id}) DO UPDATE SET
                {name} = excluded.{name},
                {description} = excluded.{description},
                {color} = excluded.{color},
                {active} = excluded.{active},
                {polygon} = excluded.{polygon},
                {centroid_lat} = excluded.{centroid_lat},
                {centroid_lon} = excluded.{centroid_lon},
                {coverage_radius_km} = excluded.{coverage_radius_km},
                {tariff_bands} = excluded.{tariff_bands},
                {updated_at} = strftime('%Y-%m-%dT%H:%M:%fZ')
            RETURNING {projection}
        "#,
        table = schema::TABLE_NAME,
        id = Columns::Id.as_str(),
        name = Columns::Name.as_str(),
        description = Columns::Description.as_str(),
        color = Columns::Color.as_str(),
        active = Columns::Active.as_str(),
        polygon = Columns::Polygon.as_str(),
        centroid_lat = Columns::CentroidLat.as_str(),
        centroid_lon = Columns::CentroidLon.as_str(),
        coverage_radius_km = Columns::CoverageRadiusKm.as_str(),
        tariff_bands = Columns::TariffBands.as_str(),
        updated_at = Columns::UpdatedAt.as_str(),
        projection = ZoneRecord::projection(),
    );
    debug!(sql);
    conn.query_row(
        &sql,
        named_params! {
            ":id": zone.id,
            ":name": zone.name,
            ":description": zone.description,
            ":color": zone.color,
            ":active": zone.active,
            ":polygon": polygon_to_geo_json(&zone.polygon)?,
            ":centroid_lat": zone.centroid.latitude,
            ":centroid_lon": zone.centroid.longitude,
            ":coverage_radius_km": zone.coverage_radius_km,
            ":tariff_bands": serde_json::to_string(&zone.tariff_bands)?,
        },
        ZoneRecord::mapper(),
    )
    .map_err(Into::into)
}

pub fn select(
    updated_since: Option<OffsetDateTime>,
    include_inactive: bool,
    limit: Option<i64>,
    conn: &Connection,
) -> Result<Vec<ZoneRecord>> {
    // updated_at is written by strftime('%Y-%m-%dT%H:%M:%fZ'), the cutoff has
    // to use the same UTC millisecond layout to compare correctly as text
    let timestamp_format =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    let updated_since = match updated_since {
        Some(updated_since) => Some(
            updated_since
                .to_offset(UtcOffset::UTC)
                .format(timestamp_format)?,
        ),
        None => None,
    };
    let include_inactive_sql = if include_inactive {
        "".into()
    } else {
        format!("AND {active} = 1", active = Columns::Active.as_str())
    };
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE (:updated_since IS NULL OR {updated_at} > :updated_since)
            {include_inactive_sql}
            ORDER BY {updated_at}, {id}
            LIMIT {limit}
        "#,
        projection = ZoneRecord::projection(),
        table = schema::TABLE_NAME,
        updated_at = Columns::UpdatedAt.as_str(),
        id = Columns::Id.as_str(),
        limit = limit.unwrap_or(i64::MAX),
    );
    debug!(sql);
    conn.prepare(&sql)?
        .query_map(
            named_params! { ":updated_since": updated_since },
            ZoneRecord::mapper(),
        )?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

pub fn select_by_id(id: i64, conn: &Connection) -> Result<ZoneRecord> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {id_col} = :id
        "#,
        projection = ZoneRecord::projection(),
        table = schema::TABLE_NAME,
        id_col = Columns::Id.as_str(),
    );
    debug!(sql);
    conn.query_row(&sql, named_params! { ":id": id }, ZoneRecord::mapper())
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Zone with id = {id} doesn't exist")))
}

pub fn set_active(id: i64, active: bool, conn: &Connection) -> Result<ZoneRecord> {
    let sql = format!(
        r#"
            UPDATE {table}
            SET {active_col} = :active, {updated_at} = strftime('%Y-%m-%dT%H:%M:%fZ')
            WHERE {id_col} = :id AND {active_col} != :active
        "#,
        table = schema::TABLE_NAME,
        active_col = Columns::Active.as_str(),
        updated_at = Columns::UpdatedAt.as_str(),
        id_col = Columns::Id.as_str(),
    );
    debug!(sql);
    conn.execute(&sql, named_params! { ":id": id, ":active": active })?;
    select_by_id(id, conn)
}

#[cfg(test)]
mod test {
    use crate::db::test::conn;
    use crate::seed::national_zone;
    use crate::test::mock_zone;
    use crate::{Error, Result};
    use time::macros::datetime;

    #[test]
    fn upsert_inserts() -> Result<()> {
        let conn = conn();
        let zone = national_zone();
        let record = super::upsert(&zone, &conn)?;
        assert_eq!(zone, record.zone);
        assert_eq!(record, super::select_by_id(zone.id, &conn)?);
        Ok(())
    }

    #[test]
    fn upsert_updates() -> Result<()> {
        let conn = conn();
        let created = super::upsert(&mock_zone(1), &conn)?;
        let mut zone = mock_zone(1);
        zone.name = "updated".into();
        zone.tariff_bands[0].surcharge = 1.5;
        let updated = super::upsert(&zone, &conn)?;
        assert_eq!(zone, updated.zone);
        assert_eq!(created.created_at, updated.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(1, super::select(None, true, None, &conn)?.len());
        Ok(())
    }

    #[test]
    fn select_by_id_not_found() {
        let conn = conn();
        assert!(matches!(
            super::select_by_id(1, &conn),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn select_filters_inactive() -> Result<()> {
        let conn = conn();
        super::upsert(&mock_zone(1), &conn)?;
        super::upsert(&mock_zone(2), &conn)?;
        super::set_active(1, false, &conn)?;
        assert_eq!(2, super::select(None, true, None, &conn)?.len());
        let active = super::select(None, false, None, &conn)?;
        assert_eq!(1, active.len());
        assert_eq!(2, active[0].zone.id);
        assert_eq!(1, super::select(None, true, Some(1), &conn)?.len());
        Ok(())
    }

    #[test]
    fn select_updated_since() -> Result<()> {
        let conn = conn();
        super::upsert(&mock_zone(1), &conn)?;
        conn.execute(
            "UPDATE zone SET updated_at = '2020-01-01T00:00:00Z' WHERE id = 1",
            [],
        )?;
        super::upsert(&mock_zone(2), &conn)?;
        let res = super::select(Some(datetime!(2021-01-01 00:00 UTC)), true, None, &conn)?;
        assert_eq!(vec![2], res.iter().map(|it| it.zone.id).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn select_updated_since_compares_milliseconds_in_utc() -> Result<()> {
        let conn = conn();
        super::upsert(&mock_zone(1), &conn)?;
        super::upsert(&mock_zone(2), &conn)?;
        conn.execute(
            "UPDATE zone SET updated_at = '2024-05-01T10:00:00.500Z' WHERE id = 1",
            [],
        )?;
        conn.execute(
            "UPDATE zone SET updated_at = '2024-05-01T09:59:59.900Z' WHERE id = 2",
            [],
        )?;
        let ids = |since| -> Result<Vec<i64>> {
            Ok(super::select(Some(since), true, None, &conn)?
                .iter()
                .map(|it| it.zone.id)
                .collect())
        };
        assert_eq!(vec![1], ids(datetime!(2024-05-01 10:00 UTC))?);
        assert_eq!(vec![2, 1], ids(datetime!(2024-05-01 09:59:59.5 UTC))?);
        // same instant as 10:00 UTC
        assert_eq!(vec![1], ids(datetime!(2024-05-01 12:00 +02:00))?);
        assert!(ids(datetime!(2024-05-01 10:00:00.5 UTC))?.is_empty());
        Ok(())
    }

    #[test]
    fn set_active_is_idempotent() -> Result<()> {
        let conn = conn();
        super::upsert(&mock_zone(1), &conn)?;
        let first = super::set_active(1, false, &conn)?;
        let second = super::set_active(1, false, &conn)?;
        assert!(!second.zone.active);
        assert_eq!(first.updated_at, second.updated_at);
        assert!(matches!(
            super::set_active(5, false, &conn),
            Err(Error::NotFound(_))
        ));
        Ok(())
    }
}
