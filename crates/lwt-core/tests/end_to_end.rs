//! End-to-end classification of synthetic pressure fields.

use approx::assert_relative_eq;
use lwt_common::{ClassifierConfig, Domain, Hemisphere, LwtError, Source};
use lwt_core::{normalize_longitudes, Centers, LwtClassifier, Octant, WeatherType};
use test_utils::fixtures::grid::{COARSE, EUROPE, GLOBAL_0_360, SOUTHERN_OCEAN};
use test_utils::{
    ensemble_field_from_fn, field_from_fn, flat_pressure_field, meridional_gradient,
    meridional_gradient_field, pressure_system, regular_axis, zonal_gradient, BACKGROUND_HPA,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn era5(hemisphere: Hemisphere) -> LwtClassifier {
    LwtClassifier::new(ClassifierConfig::new(
        Domain::Regional,
        Source::Reanalysis,
        hemisphere,
    ))
}

fn global_model() -> LwtClassifier {
    LwtClassifier::new(ClassifierConfig::new(
        Domain::Global,
        Source::Gcm,
        Hemisphere::North,
    ))
}

fn europe_centers() -> Centers {
    Centers::new(
        regular_axis("latitude", 45.0, 2.5, 5),
        regular_axis("longitude", -20.0, 5.0, 9),
    )
}

fn single_center(lat_name: &str, lon_name: &str, lat: f64, lon: f64) -> Centers {
    Centers::new(
        regular_axis(lat_name, lat, 1.0, 1),
        regular_axis(lon_name, lon, 1.0, 1),
    )
}

// ============================================================================
// Northern hemisphere reanalysis
// ============================================================================

#[test]
fn test_flat_field_is_unclassified_everywhere() {
    init_tracing();
    let field = flat_pressure_field(
        EUROPE.latitude("latitude"),
        EUROPE.longitude("longitude"),
        2,
    );
    let result = era5(Hemisphere::North).classify(&field).unwrap();

    assert_eq!(result.weather_types.len(), 2 * EUROPE.size());
    assert!(result.weather_types.iter().all(|&t| t == WeatherType::UNCLASSIFIED));
    assert!(result.flow.f.iter().all(|&f| f == 0.0));
    assert_eq!(result.classified_count(), 0);
}

#[test]
fn test_northern_westerlies_are_directional_west() {
    init_tracing();
    let field = meridional_gradient_field("latitude", "longitude", 3);
    let result = era5(Hemisphere::North)
        .classify_centers(&field, &europe_centers())
        .unwrap();

    assert!(result.codes().iter().all(|&c| c == 16));
    assert!(result.octants.iter().all(|&o| o == Some(Octant::W)));
    for &w in result.flow.w.iter() {
        assert_relative_eq!(w, 10.0, epsilon = 1e-9);
    }
    for &b in result.bearing.iter() {
        assert_relative_eq!(b, 270.0, epsilon = 1e-9);
    }
    // Vorticity stays well below the flow strength
    assert!(result.flow.z.iter().all(|&z| z > 0.0 && z < 2.0));
}

#[test]
fn test_eastward_pressure_rise_is_directional_south() {
    init_tracing();
    let field = zonal_gradient(
        EUROPE.latitude("latitude"),
        EUROPE.longitude("longitude"),
        1,
        1.0,
    );
    let result = era5(Hemisphere::North)
        .classify_centers(&field, &europe_centers())
        .unwrap();

    assert!(result.flow.s.iter().all(|&s| s > 6.0));
    assert!(result.flow.w.iter().all(|&w| w == 0.0));
    for &b in result.bearing.iter() {
        assert_relative_eq!(b, 180.0, epsilon = 1e-9);
    }
    assert!(result.octants.iter().all(|&o| o == Some(Octant::S)));
    assert!(result.codes().iter().all(|&c| c == 14));
}

#[test]
fn test_low_is_cyclonic_and_high_is_anticyclonic() {
    init_tracing();
    let center = single_center("latitude", "longitude", 50.0, 0.0);
    let classifier = era5(Hemisphere::North);

    let low = pressure_system(
        EUROPE.latitude("latitude"),
        EUROPE.longitude("longitude"),
        1,
        (50.0, 0.0),
        30.0,
        10.0,
    );
    let result = classifier.classify_centers(&low, &center).unwrap();
    assert_eq!(result.weather_types[[0, 0, 0, 0]], WeatherType::CYCLONIC);
    assert!(result.flow.z[[0, 0, 0, 0]] > 6.0);

    let high = pressure_system(
        EUROPE.latitude("latitude"),
        EUROPE.longitude("longitude"),
        1,
        (50.0, 0.0),
        -30.0,
        10.0,
    );
    let result = classifier.classify_centers(&high, &center).unwrap();
    assert_eq!(result.weather_types[[0, 0, 0, 0]], WeatherType::ANTICYCLONIC);
}

// ============================================================================
// Southern hemisphere
// ============================================================================

#[test]
fn test_southern_westerlies_use_relabeled_octants() {
    init_tracing();
    // Pressure falls towards the pole
    let field = meridional_gradient(
        SOUTHERN_OCEAN.latitude("latitude"),
        SOUTHERN_OCEAN.longitude("longitude"),
        1,
        -1.0,
    );
    let centers = Centers::new(
        regular_axis("latitude", -45.0, -2.5, 5),
        regular_axis("longitude", 80.0, 5.0, 5),
    );

    let south = era5(Hemisphere::South)
        .classify_centers(&field, &centers)
        .unwrap();
    assert!(south.octants.iter().all(|&o| o == Some(Octant::W)));
    assert!(south.codes().iter().all(|&c| c == 16));

    // Same bearings read with the northern table
    let north = era5(Hemisphere::North)
        .classify_centers(&field, &centers)
        .unwrap();
    assert_eq!(north.bearing, south.bearing);
    assert!(north.octants.iter().all(|&o| o == Some(Octant::E)));
    assert!(north.codes().iter().all(|&c| c == 12));
}

// ============================================================================
// Ensembles
// ============================================================================

#[test]
fn test_ensemble_members_are_classified_independently() {
    init_tracing();
    let gradients = [1.0, 2.0, 0.0];
    let field = ensemble_field_from_fn(
        EUROPE.latitude("latitude"),
        EUROPE.longitude("longitude"),
        2,
        gradients.len(),
        |m, lat, _| BACKGROUND_HPA - gradients[m] * lat,
    );
    let result = era5(Hemisphere::North)
        .classify_centers(&field, &europe_centers())
        .unwrap();

    assert_eq!(result.weather_types.shape(), &[2, 3, 5, 9]);
    assert_eq!(
        result.coords.dims(),
        vec!["time", "number", "latitude", "longitude"]
    );
    assert_eq!(result.coords.members, Some(vec![0, 1, 2]));

    let codes = result.codes();
    for t in 0..2 {
        for i in 0..5 {
            for j in 0..9 {
                assert_eq!(codes[[t, 0, i, j]], 16);
                assert_eq!(codes[[t, 1, i, j]], 16);
                assert_eq!(codes[[t, 2, i, j]], -1);
            }
        }
    }
}

#[test]
fn test_fields_without_members_report_three_dims() {
    let field = meridional_gradient_field("latitude", "longitude", 1);
    let result = era5(Hemisphere::North)
        .classify_centers(&field, &europe_centers())
        .unwrap();
    assert_eq!(result.coords.dims(), vec!["time", "latitude", "longitude"]);
    assert_eq!(result.weather_types.shape(), &[1, 1, 5, 9]);
}

// ============================================================================
// Global climate-model grids
// ============================================================================

fn wavy_global_field(amplitude: f64) -> lwt_common::PressureField {
    field_from_fn(
        GLOBAL_0_360.latitude("lat"),
        GLOBAL_0_360.longitude("lon"),
        1,
        |lat, lon| BACKGROUND_HPA - lat + amplitude * lon.to_radians().cos(),
    )
}

#[test]
fn test_global_field_is_normalized_before_classification() {
    init_tracing();
    let field = meridional_gradient(
        GLOBAL_0_360.latitude("lat"),
        GLOBAL_0_360.longitude("lon"),
        1,
        1.0,
    );
    let result = global_model().classify(&field).unwrap();

    let lon = &result.coords.longitude;
    assert_eq!(lon.name(), "lon");
    assert_eq!(lon.len(), 144);
    assert_eq!(lon.first(), -177.5);
    assert_eq!(lon.last(), 180.0);

    // Row of the 50N centers
    let i = result.coords.latitude.nearest_index(50.0);
    assert_eq!(result.coords.latitude.values()[i], 50.0);
    let codes = result.codes();
    assert!((0..lon.len()).all(|j| codes[[0, 0, i, j]] == 16));
}

#[test]
fn test_global_domain_wraps_across_antimeridian() {
    init_tracing();
    let field = wavy_global_field(20.0);
    let centers = single_center("lat", "lon", 50.0, 180.0);

    // The wave is symmetric about 180, so wrapped samples see no southerly flow
    let wrapped = global_model().classify_centers(&field, &centers).unwrap();
    assert_relative_eq!(wrapped.bearing[[0, 0, 0, 0]], 270.0, epsilon = 1e-6);
    assert_eq!(wrapped.codes()[[0, 0, 0, 0]], 16);

    // A regional layout clamps the eastern points to the grid edge instead
    let regional = LwtClassifier::new(ClassifierConfig::new(
        Domain::Regional,
        Source::Gcm,
        Hemisphere::North,
    ));
    let clamped = regional.classify_centers(&field, &centers).unwrap();
    assert!((clamped.bearing[[0, 0, 0, 0]] - 270.0).abs() > 0.5);
}

#[test]
fn test_prenormalized_input_gives_same_result() {
    let field = wavy_global_field(5.0);
    let normalized = normalize_longitudes(&field, "lon").unwrap();
    let centers = Centers::new(
        regular_axis("lat", 40.0, 2.5, 9),
        regular_axis("lon", -177.5, 2.5, 144),
    );

    let classifier = global_model();
    let a = classifier.classify_centers(&field, &centers).unwrap();
    let b = classifier.classify_centers(&normalized, &centers).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_center_longitudes_in_either_convention_agree() {
    init_tracing();
    let field = wavy_global_field(20.0);
    let classifier = global_model();

    let east = classifier
        .classify_centers(&field, &single_center("lat", "lon", 50.0, 200.0))
        .unwrap();
    let west = classifier
        .classify_centers(&field, &single_center("lat", "lon", 50.0, -160.0))
        .unwrap();

    assert_eq!(east.coords.longitude.values(), &[-160.0]);
    assert_eq!(east.flow.w[[0, 0, 0, 0]].to_bits(), west.flow.w[[0, 0, 0, 0]].to_bits());
    assert_eq!(east.flow.s[[0, 0, 0, 0]].to_bits(), west.flow.s[[0, 0, 0, 0]].to_bits());
    assert_eq!(east, west);
}

#[test]
fn test_degenerate_latitudes_do_not_fail() {
    init_tracing();
    let field = meridional_gradient(
        GLOBAL_0_360.latitude("lat"),
        GLOBAL_0_360.longitude("lon"),
        1,
        1.0,
    );
    // 5N and 5S have infinite constants
    let centers = Centers::new(
        regular_axis("lat", -10.0, 5.0, 5),
        regular_axis("lon", 0.0, 10.0, 3),
    );
    let result = global_model().classify_centers(&field, &centers).unwrap();
    assert_eq!(result.weather_types.shape(), &[1, 1, 5, 3]);
    assert!(result.flow.z.iter().any(|z| !z.is_finite()));
}

#[test]
fn test_coarse_grid_still_classifies() {
    init_tracing();
    let field = meridional_gradient(
        COARSE.latitude("latitude"),
        COARSE.longitude("longitude"),
        1,
        1.0,
    );
    let result = era5(Hemisphere::North).classify(&field).unwrap();

    assert_eq!(result.weather_types.shape(), &[1, 1, COARSE.n_lat, COARSE.n_lon]);
    // Center (50, 0) still sees the westerly gradient
    assert_eq!(result.octants[[0, 0, 2, 3]], Some(Octant::W));
}

// ============================================================================
// Caching and determinism
// ============================================================================

#[test]
fn test_repeated_runs_are_identical_and_cached() {
    let field = meridional_gradient_field("latitude", "longitude", 2);
    let classifier = era5(Hemisphere::North);

    let first = classifier.classify(&field).unwrap();
    let second = classifier.classify(&field).unwrap();
    assert_eq!(first.codes(), second.codes());
    assert_eq!(first.flow.z, second.flow.z);

    let stats = classifier.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.entries, 1);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_axis_names_must_match_the_source() {
    let field = meridional_gradient_field("lat", "lon", 1);
    let err = era5(Hemisphere::North).classify(&field).unwrap_err();
    assert!(matches!(err, LwtError::AxisNotFound { .. }));

    let field = meridional_gradient_field("latitude", "longitude", 1);
    let err = global_model().classify(&field).unwrap_err();
    assert!(matches!(err, LwtError::AxisNotFound { .. }));
}

#[test]
fn test_malformed_axis_is_rejected_before_classification() {
    let err = lwt_common::CoordAxis::new("latitude", vec![50.0, 55.0, 52.5]).unwrap_err();
    assert!(matches!(err, LwtError::MalformedAxis { .. }));
}

#[test]
fn test_center_selection_outside_the_grid() {
    let err = Centers::from_field(&meridional_gradient_field("latitude", "longitude", 1))
        .restrict_latitudes(80.0, 85.0)
        .unwrap_err();
    assert!(matches!(err, LwtError::EmptySelection(_)));
}

#[test]
fn test_classification_serializes_to_json() {
    let field = meridional_gradient_field("latitude", "longitude", 1);
    let centers = single_center("latitude", "longitude", 50.0, 0.0);
    let result = era5(Hemisphere::North)
        .classify_centers(&field, &centers)
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["weather_types"]["data"][0], 16);
    assert_eq!(json["octants"]["data"][0], "W");
    assert_eq!(json["coords"]["latitude"]["name"], "latitude");
}
