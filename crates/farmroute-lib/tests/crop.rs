use farmroute_lib::{optimize_for_crop, CropType, ErrorKind, Priority};

#[test]
fn highly_perishable_eta() {
    let plan = optimize_for_crop(100.0, "Highly Perishable", 500.0);
    assert_eq!(plan.adjusted_speed_kmh, 42.5);
    assert!((plan.eta_minutes - 141.18).abs() < 0.01);
    assert_eq!(plan.recommended_stops, 1);
    assert_eq!(plan.priority, Priority::High);

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["priority"], "high");
    assert_eq!(json["crop"], "Highly Perishable");
}

#[test]
fn every_class_has_a_plan() {
    for crop in CropType::ALL {
        let plan = optimize_for_crop(300.0, crop.label(), 1.0);
        assert_eq!(plan.adjusted_speed_kmh, 50.0 * crop.speed_factor());
        let expected_stops = match crop {
            CropType::HighlyPerishable | CropType::Fragile => 3,
            _ => 2,
        };
        assert_eq!(plan.recommended_stops, expected_stops, "{crop}");
    }
}

#[test]
fn unknown_crop_degrades_but_parse_fails() {
    let err = "Mangoes".parse::<CropType>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let plan = optimize_for_crop(75.0, "Mangoes", 1.0);
    assert_eq!(plan.adjusted_speed_kmh, 50.0);
    assert_eq!(plan.eta_minutes, 90.0);
    assert_eq!(plan.priority, Priority::Medium);
}
