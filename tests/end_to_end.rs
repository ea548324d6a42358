//! End-to-end behaviour of the filter engine against real SQLite and a
//! recorded time-series store.

use async_trait::async_trait;
use nemdata::compile::{compile_pipeline, compile_relational, Stage};
use nemdata::data::{read_generation_grouped, DemandFilter, UnitFilter};
use nemdata::filter::{FilterShape, IntRangeFilter, QueryParams, StringFilter, TimeBound};
use nemdata::group::{expand, GroupError};
use nemdata::store::{
    FluxRecord, RelationalStore, SqliteStore, StoreResult, TimeSeriesStore, Unit,
};
use rusqlite::Connection;
use std::sync::Mutex;

const FIXTURE: &[(&str, &str, &str, &str, &str, i64)] = &[
    ("BAYSW1", "Bayswater", "NSW1", "Coal", "Steam Sub-Critical", 660),
    ("ER01", "Eraring", "NSW1", "Coal", "Steam Sub-Critical", 720),
    ("TALWA1", "Tallawarra", "NSW1", "Gas", "Combined Cycle", 440),
    ("LYA1", "Loy Yang A", "VIC1", "Brown Coal", "Steam Sub-Critical", 560),
    ("MACARTH1", "Macarthur", "VIC1", "Wind", "Wind Turbine", 420),
    ("BNGSF1", "Bungala 100%_Solar", "SA1", "Solar", "Photovoltaic", 110),
    ("O'BRIEN1", "O'Brien's Hill", "QLD1", "Solar", "Photovoltaic", 5),
];

fn fixture_store(rows: &[(&str, &str, &str, &str, &str, i64)]) -> SqliteStore {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE units (
            id INTEGER PRIMARY KEY,
            duid TEXT NOT NULL,
            station_name TEXT,
            region_id TEXT,
            fuel_source TEXT,
            technology_type TEXT,
            max_capacity INTEGER
        )",
    )
    .unwrap();
    for (duid, station, region, fuel, tech, capacity) in rows {
        conn.execute(
            "INSERT INTO units (duid, station_name, region_id, fuel_source, technology_type, max_capacity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![duid, station, region, fuel, tech, capacity],
        )
        .unwrap();
    }
    SqliteStore::from_connection(conn)
}

fn fixture_units() -> Vec<Unit> {
    FIXTURE
        .iter()
        .map(|(duid, station, region, fuel, tech, capacity)| Unit {
            duid: duid.to_string(),
            station_name: station.to_string(),
            region_id: region.to_string(),
            fuel_source: fuel.to_string(),
            technology_type: tech.to_string(),
            max_capacity: *capacity,
        })
        .collect()
}

fn dims(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[derive(Default)]
struct RecordingSeries {
    rows: Vec<FluxRecord>,
    scripts: Mutex<Vec<String>>,
}

#[async_trait]
impl TimeSeriesStore for RecordingSeries {
    async fn query(&self, script: &str) -> StoreResult<Vec<FluxRecord>> {
        self.scripts.lock().unwrap().push(script.to_string());
        Ok(self.rows.clone())
    }
}

#[test]
fn demand_region_and_range() {
    let params = QueryParams::new()
        .with("region_id.eq", "NSW1")
        .with("range.start", "-1d");

    let pipeline = compile_pipeline(&DemandFilter::from_params(&params));

    assert_eq!(
        pipeline.stages(),
        [
            Stage::Range {
                start: TimeBound::Relative("-1d".to_string()),
                stop: None,
            },
            Stage::equals("regionId", "NSW1"),
        ]
    );
}

#[test]
fn string_equals_ignores_contains() {
    let contains_sets: [&[&str]; 3] = [&[], &["ayswa"], &["x", "y", "%"]];
    for contains in contains_sets {
        let filter = StringFilter::equals(["NSW1", "VIC1"]).with_contains(contains.iter().copied());

        let clause = filter_clause(&filter);
        assert_eq!(clause, "(region_id = 'NSW1' OR region_id = 'VIC1')");
        assert!(!clause.contains("LIKE"));
    }
}

fn filter_clause(region: &StringFilter) -> String {
    let shape = UnitFilter {
        region_id: region.clone(),
        ..Default::default()
    };
    compile_relational(&shape).fragments().join(" AND ")
}

#[test]
fn int_equals_ignores_bounds() {
    let bounds = [(None, None), (Some(1), None), (None, Some(9)), (Some(700), Some(2))];
    for (gt, lt) in bounds {
        let shape = UnitFilter {
            max_capacity: IntRangeFilter {
                equals: Some(660),
                greater_than: gt,
                less_than: lt,
            },
            ..Default::default()
        };
        assert_eq!(
            compile_relational(&shape).fragments(),
            ["(max_capacity = 660)"]
        );
    }
}

#[test]
fn bad_start_uses_default_range_whatever_the_stop() {
    for start in [None, Some(""), Some("yesterday"), Some("-1x"), Some("2024-13-01")] {
        for stop in [None, Some("now()"), Some("-1h"), Some("2024-01-02T00:00:00Z")] {
            let mut params = QueryParams::new();
            if let Some(s) = start {
                params.insert("range.start", s);
            }
            if let Some(s) = stop {
                params.insert("range.stop", s);
            }

            let pipeline = compile_pipeline(&DemandFilter::from_params(&params));
            match &pipeline.stages()[0] {
                Stage::Range { start, .. } => assert_eq!(start, &TimeBound::default_start()),
                other => panic!("expected range, got {:?}", other),
            }
        }
    }
}

#[tokio::test]
async fn region_by_fuel_expansion() {
    let store = fixture_store(&[
        ("A", "A", "NSW1", "Coal", "", 1),
        ("B", "B", "NSW1", "Gas", "", 1),
        ("C", "C", "VIC1", "Coal", "", 1),
    ]);
    let params = QueryParams::new().with("group", "region").with("group", "fuel");
    let groups = StringFilter::equals(params.get("group").unwrap().iter().cloned());

    let expansion = expand(groups.equals_values(), &UnitFilter::default(), &store)
        .await
        .unwrap();

    let members = |label: &str| -> Vec<String> {
        expansion
            .get(label)
            .unwrap()
            .units
            .iter()
            .map(|u| u.duid.clone())
            .collect()
    };
    assert_eq!(expansion.len(), 4);
    assert_eq!(members("NSW1+Coal"), ["A"]);
    assert_eq!(members("NSW1+Gas"), ["B"]);
    assert_eq!(members("VIC1+Coal"), ["C"]);
    assert!(members("VIC1+Gas").is_empty());
}

#[tokio::test]
async fn expansion_size_is_region_count_times_fuel_count() {
    let store = fixture_store(FIXTURE);
    let regions = store.distinct_values("region_id").await.unwrap();
    let fuels = store.distinct_values("fuel_source").await.unwrap();

    let expansion = expand(&dims(&["region", "fuel"]), &UnitFilter::default(), &store)
        .await
        .unwrap();

    assert_eq!(expansion.len(), regions.len() * fuels.len());
    for region in &regions {
        for fuel in &fuels {
            let label = format!("{}+{}", region, fuel);
            assert!(expansion.get(&label).is_some(), "missing {}", label);
        }
    }
    let total: usize = expansion.iter().map(|c| c.units.len()).sum();
    assert_eq!(total, FIXTURE.len());
}

#[tokio::test]
async fn repeated_dimension_is_idempotent() {
    let store = fixture_store(FIXTURE);
    let once = expand(&dims(&["region"]), &UnitFilter::default(), &store)
        .await
        .unwrap();
    let twice = expand(&dims(&["region", "region"]), &UnitFilter::default(), &store)
        .await
        .unwrap();
    assert_eq!(once, twice);
}

#[tokio::test]
async fn unknown_dimension_fails_without_partials() {
    let store = fixture_store(FIXTURE);
    let result = expand(&dims(&["region", "owner", "fuel"]), &UnitFilter::default(), &store).await;
    assert!(matches!(result, Err(GroupError::UnknownDimension(d)) if d == "owner"));
}

type Selector = Box<dyn Fn(&Unit) -> bool>;

fn case(params: QueryParams, selector: impl Fn(&Unit) -> bool + 'static) -> (QueryParams, Selector) {
    (params, Box::new(selector))
}

#[tokio::test]
async fn relational_clause_selects_hand_picked_units() {
    let store = fixture_store(FIXTURE);
    let all = fixture_units();

    let cases = vec![
        case(QueryParams::new(), |_| true),
        case(
            QueryParams::new().with("region_id.eq", "NSW1").with("region_id.eq", "SA1"),
            |u| u.region_id == "NSW1" || u.region_id == "SA1",
        ),
        case(
            QueryParams::new().with("fuel_source.li", "Coal"),
            |u| u.fuel_source.contains("Coal"),
        ),
        case(
            QueryParams::new()
                .with("max_capacity.gt", "400")
                .with("max_capacity.lt", "700"),
            |u| u.max_capacity > 400 && u.max_capacity < 700,
        ),
        case(
            QueryParams::new().with("station_name.li", "100%"),
            |u| u.station_name.contains("100%"),
        ),
        case(
            QueryParams::new().with("station_name.li", "_"),
            |u| u.station_name.contains('_'),
        ),
        case(
            QueryParams::new().with("station_name.eq", "O'Brien's Hill"),
            |u| u.station_name == "O'Brien's Hill",
        ),
        case(
            QueryParams::new()
                .with("technology_type.eq", "Steam Sub-Critical")
                .with("max_capacity.eq", "660")
                .with("max_capacity.gt", "1000"),
            |u| u.technology_type == "Steam Sub-Critical" && u.max_capacity == 660,
        ),
    ];

    for (params, predicate) in cases {
        let clause = compile_relational(&UnitFilter::from_params(&params));
        let selected = store.read_units(&clause).await.unwrap();
        let expected: Vec<Unit> = all.iter().filter(|&u| predicate(u)).cloned().collect();
        assert_eq!(selected, expected, "clause:{}", clause);
    }
}

#[tokio::test]
async fn grouped_generation_round_trip() {
    let store = fixture_store(FIXTURE);
    // NSW1 and VIC1 are the populated groups, yielded as g0 and g1
    let row = |group: &str, minute: u32, value: f64| FluxRecord {
        result: if group == "NSW1" { "g0" } else { "g1" }.to_string(),
        table: 0,
        values: [
            ("group".to_string(), group.to_string()),
            ("_time".to_string(), format!("2024-06-01T10:{:02}:00Z", minute)),
            ("_value".to_string(), value.to_string()),
        ]
        .into_iter()
        .collect(),
    };
    let series = RecordingSeries {
        rows: vec![
            row("VIC1", 0, 980.0),
            row("NSW1", 0, 1820.5),
            row("VIC1", 5, 990.0),
        ],
        ..Default::default()
    };

    let params = QueryParams::new()
        .with("group", "region")
        .with("fuel_source.eq", "Coal")
        .with("fuel_source.eq", "Brown Coal")
        .with("aggregate.every", "1h")
        .with("aggregate.fn", "mean");

    let result = read_generation_grouped(&params, &store, &series, "nema_bucket")
        .await
        .unwrap();

    let labels: Vec<&str> = result.iter().map(|s| s.group.as_str()).collect();
    assert_eq!(labels, ["VIC1", "NSW1"]);
    assert_eq!(result[0].data.len(), 2);
    assert_eq!(result[1].data[0].value, 1820.5);

    let scripts = series.scripts.lock().unwrap();
    assert_eq!(scripts.len(), 1);
    let script = &scripts[0];
    assert_eq!(script.matches("from(bucket: \"nema_bucket\")").count(), 2);
    assert!(script.contains("r.unit == \"BAYSW1\" or r.unit == \"ER01\""));
    assert!(script.contains("r.unit == \"LYA1\""));
    assert!(!script.contains("TALWA1"));
    assert!(script.contains("aggregateWindow(every: 1h, fn: mean, createEmpty: false)"));
}
