use serde_json::json;
use stay_scout::fields::field_value;
use stay_scout::scrapers::FileDetailsSource;
use stay_scout::{AppConfig, Error, ListingService, RawPayload};
use tempfile::TempDir;

const URL: &str =
    "https://www.airbnb.com/rooms/777?check_in=2024-06-10&check_out=2024-06-14&adults=2";

fn payload() -> RawPayload {
    json!({
        "price": {"main": {"discountedPrice": "$1,280.50", "price": "$1,400"}},
        "coordinates": {"latitude": 38.71, "longitude": -9.13},
        "is_super_host": true,
        "person_capacity": 4,
        "rating": {"accuracy": 4.9, "cleanliness": 4.7, "review_count": 88},
        "amenities": [
            {"title": "Kitchen", "values": [{"title": "Kettle"}, {"title": "Oven", "subtitle": "Gas"}]}
        ],
        "images": [{"url": "https://img/cover.jpg"}, {"url": "https://img/2.jpg"}],
        "location_descriptions": [
            {"title": "Alfama, Lisbon", "content": "Old quarter<br />Steep streets"},
            {"title": "Getting around", "content": "Tram 28"}
        ],
        "house_rules": {
            "general": [
                {"title": "Checking in and out", "values": [{"title": "Check-in after 3:00 pm"}]}
            ]
        },
        "reviews": [{"comments": "Lovely", "rating": 5, "language": "en", "localizedDate": "May 2024"}]
    })
}

fn config(dir: &TempDir) -> AppConfig {
    AppConfig {
        database_path: dir.path().join("db").join("listings.db"),
        debug_dump_dir: Some(dir.path().to_path_buf()),
        ..AppConfig::default()
    }
}

#[test]
fn payload_to_stored_fields() {
    let dir = TempDir::new().unwrap();
    let mut service = ListingService::open(&config(&dir)).unwrap();

    let record = service.ingest(URL, &payload()).unwrap();
    assert_eq!(record.id, 777);
    assert_eq!(record.duration, 4);
    assert_eq!(record.cost, 1280.5);
    assert!(dir.path().join("listing_777.json").exists());

    let stored = service.listing_by_id(777).unwrap().unwrap();
    assert_eq!(field_value("Cover", &stored).unwrap(), json!("https://img/cover.jpg"));
    assert_eq!(field_value("Cost", &stored).unwrap(), json!(1280.5));
    assert_eq!(field_value("Location", &stored).unwrap(), json!("Alfama, Lisbon"));
    assert_eq!(field_value("Getting Around", &stored).unwrap(), json!("Tram 28"));
    assert_eq!(field_value("Rating", &stored).unwrap(), json!(4.8));
    assert_eq!(
        field_value("Amenities", &stored).unwrap(),
        json!({"Kitchen": ["Kettle", "Oven: (Gas)"]})
    );
    assert_eq!(
        field_value("Check In/ Out Timing", &stored).unwrap(),
        json!(["Check-in after 3:00 pm"])
    );
    assert!(field_value("Nonsense", &stored).is_err());

    service.close().unwrap();
}

#[test]
fn listings_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    let mut service = ListingService::open(&config).unwrap();
    service.ingest(URL, &payload()).unwrap();
    assert!(service.set_notes(777, "ask about parking").unwrap());
    service.close().unwrap();

    let service = ListingService::open(&config).unwrap();
    assert_eq!(service.listing_count().unwrap(), 1);
    let stored = service.listing_by_id(777).unwrap().unwrap();
    assert_eq!(stored.notes.as_deref(), Some("ask about parking"));
    assert_eq!(stored.images.len(), 2);
    assert_eq!(service.listings_by_location("alfama").unwrap().len(), 1);
}

#[test]
fn invalid_url_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let mut service = ListingService::open(&config(&dir)).unwrap();

    let reversed = "https://www.airbnb.com/rooms/777?check_in=2024-06-14&check_out=2024-06-10";
    assert!(matches!(service.ingest(reversed, &payload()), Err(Error::Url(_))));
    assert_eq!(service.listing_count().unwrap(), 0);
}

#[tokio::test]
async fn saved_payload_feeds_add_listing() {
    let dir = TempDir::new().unwrap();
    let saved = dir.path().join("saved.json");
    std::fs::write(&saved, payload().to_string()).unwrap();
    let mut service = ListingService::open(&config(&dir)).unwrap();

    let record = service
        .add_listing(URL, &FileDetailsSource::new(&saved))
        .await
        .unwrap();

    assert_eq!(record.reviews_summary.len(), 1);
    assert!(service.listing_exists(777).unwrap());
}
