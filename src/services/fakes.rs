// src/services/fakes.rs
// DOCUMENTATION: In-memory collaborators for handler and service tests

use crate::errors::{AuthError, MaintenanceError, PlacesError};
use crate::models::*;
use crate::services::report::render_markdown;
use crate::services::{
    AuthProvider, GooglePlace, IndexMonitor, MaintenanceReporter, PlaceSearchResult,
    PlacesProvider,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// JPEG SOI marker followed by a JFIF header stub
pub const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

fn place(place_id: &str, name: &str) -> GooglePlace {
    serde_json::from_value(serde_json::json!({
        "place_id": place_id,
        "name": name,
        "types": ["restaurant", "food"],
        "geometry": { "location": { "lat": 41.6488, "lng": -0.8891 } },
        "formatted_address": "Plaza del Pilar 1, Zaragoza",
        "rating": 4.6
    }))
    .expect("fixture place is valid")
}

// ===== FakePlaces =====

#[derive(Default)]
pub struct FakePlaces {
    fail: bool,
    pub photo_widths: Mutex<Vec<u32>>,
    pub searches: Mutex<Vec<(String, Option<String>)>>,
}

impl FakePlaces {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl PlacesProvider for FakePlaces {
    async fn search_places(
        &self,
        query: &str,
        city: Option<&str>,
    ) -> Result<PlaceSearchResult, PlacesError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), city.map(str::to_string)));

        if self.fail {
            return Err(PlacesError::ExternalApi("The provided API key is invalid.".to_string()));
        }

        Ok(PlaceSearchResult {
            results: vec![place("ChIJ_fake_1", &format!("{} place", query))],
            next_page_token: None,
        })
    }

    async fn place_details(&self, place_id: &str) -> Result<GooglePlace, PlacesError> {
        if self.fail {
            return Err(PlacesError::Request("connection reset".to_string()));
        }
        Ok(place(place_id, "El Tubo"))
    }

    async fn place_photo(
        &self,
        _photo_reference: &str,
        max_width: u32,
    ) -> Result<Bytes, PlacesError> {
        self.photo_widths.lock().unwrap().push(max_width);

        if self.fail {
            return Err(PlacesError::RateLimitExceeded);
        }
        Ok(Bytes::from_static(FAKE_JPEG))
    }
}

// ===== FakeAuth =====

pub struct FakeAuth {
    result: Result<Session, String>,
    calls: AtomicUsize,
    pub codes: Mutex<Vec<String>>,
    pub verifiers: Mutex<Vec<Option<String>>>,
}

impl FakeAuth {
    pub fn succeeding() -> Self {
        Self {
            result: Ok(Session {
                access_token: "access-abc".to_string(),
                refresh_token: "refresh-xyz".to_string(),
                token_type: "bearer".to_string(),
                expires_in: 3600,
                expires_at: None,
                user: AuthUser {
                    id: Uuid::nil(),
                    email: Some("ana@example.com".to_string()),
                },
            }),
            calls: AtomicUsize::new(0),
            codes: Mutex::new(Vec::new()),
            verifiers: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            codes: Mutex::new(Vec::new()),
            verifiers: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<Session, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.codes.lock().unwrap().push(code.to_string());
        self.verifiers
            .lock()
            .unwrap()
            .push(code_verifier.map(str::to_string));

        self.result
            .clone()
            .map_err(AuthError::Provider)
    }
}

// ===== FakeMaintenance =====

#[derive(Default)]
pub struct FakeMaintenance {
    fail: bool,
    pub report_calls: AtomicUsize,
}

impl FakeMaintenance {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), MaintenanceError> {
        if self.fail {
            Err(MaintenanceError::Database(
                "pool timed out while waiting for an open connection".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IndexMonitor for FakeMaintenance {
    async fn index_usage(&self) -> Result<Vec<IndexUsage>, MaintenanceError> {
        self.check()?;
        Ok(sample_snapshot().indexes.usage)
    }

    async fn unused_indexes(&self) -> Result<Vec<UnusedIndex>, MaintenanceError> {
        self.check()?;
        Ok(sample_snapshot().indexes.unused)
    }

    async fn missing_indexes(&self) -> Result<Vec<MissingIndexCandidate>, MaintenanceError> {
        self.check()?;
        Ok(sample_snapshot().indexes.missing)
    }

    async fn index_sizes(&self) -> Result<Vec<IndexSize>, MaintenanceError> {
        self.check()?;
        Ok(sample_snapshot().indexes.sizes)
    }

    async fn index_health(&self) -> Result<IndexHealth, MaintenanceError> {
        self.check()?;
        Ok(sample_snapshot().indexes.health)
    }

    async fn index_report(&self) -> Result<IndexReport, MaintenanceError> {
        self.check()?;
        Ok(sample_snapshot().indexes)
    }
}

#[async_trait]
impl MaintenanceReporter for FakeMaintenance {
    async fn generate_report(&self) -> Result<String, MaintenanceError> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(render_markdown(&sample_snapshot()))
    }
}

/// Fixed snapshot: one unused index, one sequential-scan table, one bloated table
pub fn sample_snapshot() -> MaintenanceSnapshot {
    let generated_at = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();

    let indexes = IndexReport {
        generated_at,
        health: IndexHealth {
            status: HealthStatus::Warning,
            total_indexes: 3,
            total_index_size_bytes: 49_152,
            total_index_size: "48 kB".to_string(),
            unused_indexes: 1,
            invalid_indexes: Vec::new(),
            cache_hit_ratio: Some(0.991),
        },
        usage: vec![IndexUsage {
            schema_name: "public".to_string(),
            table_name: "lists".to_string(),
            index_name: "lists_pkey".to_string(),
            index_scans: 1_204,
            tuples_read: 1_310,
            tuples_fetched: 1_204,
        }],
        unused: vec![UnusedIndex {
            schema_name: "public".to_string(),
            table_name: "list_items".to_string(),
            index_name: "idx_list_items_note".to_string(),
            index_size_bytes: 16_384,
            index_size: "16 kB".to_string(),
        }],
        missing: vec![MissingIndexCandidate {
            schema_name: "public".to_string(),
            table_name: "saved_places".to_string(),
            seq_scans: 120,
            seq_tuples_read: 480_000,
            index_scans: 3,
            live_tuples: 4_000,
        }],
        sizes: vec![IndexSize {
            schema_name: "public".to_string(),
            table_name: "lists".to_string(),
            index_name: "lists_pkey".to_string(),
            index_size_bytes: 16_384,
            index_size: "16 kB".to_string(),
            table_size_bytes: 40_960,
            table_size: "40 kB".to_string(),
        }],
    };

    let tables = vec![
        TableMaintenance {
            schema_name: "public".to_string(),
            table_name: "list_items".to_string(),
            live_tuples: 10_000,
            dead_tuples: 5_000,
            last_vacuum: None,
            last_autovacuum: Some(Utc.with_ymd_and_hms(2026, 10, 1, 3, 0, 0).unwrap()),
            last_analyze: None,
            last_autoanalyze: None,
        },
        TableMaintenance {
            schema_name: "public".to_string(),
            table_name: "lists".to_string(),
            live_tuples: 200,
            dead_tuples: 0,
            last_vacuum: None,
            last_autovacuum: None,
            last_analyze: None,
            last_autoanalyze: None,
        },
    ];

    MaintenanceSnapshot {
        generated_at,
        indexes,
        tables,
    }
}
