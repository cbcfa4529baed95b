use anyhow::Result;
use shading3d::shading::config::ProbeConfig;
use shading3d::shading::{GeometryProbe, ShadingConfig, Window, WindowShading, compute_all};
use shading3d::{Point, Polygon, Solid, Vector};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 1.5 x 1.2 glazing facing south (-y) in the plane y = 0, sill at z = 1.
fn south_window(name: &str, x0: f64) -> Result<Window> {
    let glazing = Polygon::new(
        name,
        vec![
            Point::new(x0, 0., 1.),
            Point::new(x0 + 1.5, 0., 1.),
            Point::new(x0 + 1.5, 0., 2.2),
            Point::new(x0, 0., 2.2),
        ],
        None,
    )?;
    Window::new(glazing)
}

/// Wall of the given thickness in front of the glazing plane, with an opening for `south_window(_, 0.)`.
fn wall_around_opening(thickness: f64) -> Result<Vec<Solid>> {
    let y0 = -thickness;
    Ok(vec![
        Solid::from_box(1., thickness, 3., Some((-1., y0, 0.)), "jamb_left")?,
        Solid::from_box(1., thickness, 3., Some((1.5, y0, 0.)), "jamb_right")?,
        Solid::from_box(1.5, thickness, 1., Some((0., y0, 0.)), "sill")?,
        Solid::from_box(1.5, thickness, 0.8, Some((0., y0, 2.2)), "head")?,
    ])
}

fn neighbour(distance: f64, height: f64) -> Result<Solid> {
    Solid::from_box(40., 10., height, Some((-20., -distance - 10., 0.)), "neighbour")
}

#[test]
fn test_unobstructed_windows_are_unshaded() -> Result<()> {
    init_logging();
    let outer = |normal: Vector| -> Result<Polygon> {
        // Unit square spanned by the in-plane right and up directions
        let up = Vector::up().reject(normal).normalize().unwrap();
        let right = up.cross(normal);
        let o = Point::new(0., 0., 1.);
        Polygon::new(
            "glazing",
            vec![o, o + right, o + right + up, o + up],
            Some(normal),
        )
    };

    let normals = [
        Vector::new(0., -1., 0.),
        Vector::new(1., 0., 0.),
        Vector::new(0., 1., 0.),
        Vector::new(-1., -1., 0.),
        Vector::new(0.3, -0.5, 0.8),
    ];
    for n in normals {
        let mut ws = WindowShading::new(Window::new(outer(n.normalize().unwrap())?)?);
        let f = ws.compute(&[], 52.);
        assert!((f.winter - 1.).abs() < 1e-12, "{n}: {f:?}");
        assert!((f.summer - 1.).abs() < 1e-12, "{n}: {f:?}");
    }
    Ok(())
}

#[test]
fn test_deep_reveal() -> Result<()> {
    init_logging();
    let wall = wall_around_opening(0.3)?;
    let ws = WindowShading::new(south_window("recessed", 0.)?);
    let report = ws.report(&GeometryProbe::default(), &wall, 47.);
    let m = report.measurements;

    // Both jambs measure the same reveal
    let offset = 0.3 * 90_f64.sin();
    assert!((m.reveal.offset - offset).abs() < 1e-9, "{m:?}");
    assert!((m.reveal.depth - (0.09 - offset * offset).sqrt()).abs() < 1e-9, "{m:?}");

    // The head is flush with the glazing top edge
    assert!(m.overhang.drop.abs() < 1e-9, "{m:?}");
    assert!((m.overhang.offset - 0.3).abs() < 1e-9, "{m:?}");

    for season in [report.winter, report.summer] {
        assert!(season.reveal < 1. && season.reveal > 0.);
        assert!(season.overhang < 1. && season.overhang > 0.);
        assert!((season.horizon - 1.).abs() < 1e-9);
    }
    assert!(report.factors().is_within_unit_range());
    Ok(())
}

#[test]
fn test_distant_neighbour_shades_less() -> Result<()> {
    init_logging();
    let mut previous = (0., 0.);
    for distance in [4., 8., 16., 32., 64.] {
        let mut ws = WindowShading::new(south_window("w", 0.)?);
        let f = ws.compute(&[neighbour(distance, 12.)?], 40.);
        assert!(f.winter >= previous.0 && f.summer >= previous.1, "{distance}: {f:?}");
        previous = (f.winter, f.summer);
    }
    // Beyond the search radius nothing is found
    let mut ws = WindowShading::new(south_window("w", 0.)?);
    let f = ws.compute(&[neighbour(120., 12.)?], 40.);
    assert!((f.winter - 1.).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_compute_is_repeatable() -> Result<()> {
    let mut obstructions = wall_around_opening(0.25)?;
    obstructions.push(neighbour(10., 9.)?);
    let mut ws = WindowShading::new(south_window("w", 0.)?);
    let a = ws.compute(&obstructions, 51.5);
    let b = ws.compute(&obstructions, 51.5);
    assert_eq!(a.winter.to_bits(), b.winter.to_bits());
    assert_eq!(a.summer.to_bits(), b.summer.to_bits());
    Ok(())
}

#[test]
fn test_manual_override() -> Result<()> {
    let mut ws = WindowShading::new(south_window("w", 0.)?);
    assert_eq!((ws.winter(), ws.summer()), (0.75, 0.75));
    ws.set_factors(0.9, 0.5);
    assert_eq!((ws.winter(), ws.summer()), (0.9, 0.5));
    ws.compute(&[neighbour(6., 10.)?], 45.);
    assert!(ws.winter() < 0.9);
    ws.set_factors(0.2, 0.1);
    assert_eq!((ws.winter(), ws.summer()), (0.2, 0.1));
    Ok(())
}

#[test]
fn test_config_from_file_limits_search() -> Result<()> {
    let path = std::env::temp_dir().join("shading3d_window_shading_test.json");
    let config = ShadingConfig {
        probe: ProbeConfig {
            search_radius: 4.,
            ..ProbeConfig::default()
        },
        ..ShadingConfig::default()
    };
    std::fs::write(&path, config.to_json_string()?)?;
    let loaded = ShadingConfig::from_json_file(&path)?;
    std::fs::remove_file(&path)?;

    let obstructions = [neighbour(5., 12.)?];
    let mut ws = WindowShading::with_config(south_window("w", 0.)?, &loaded);
    let f = ws.compute(&obstructions, 45.);
    assert!((f.winter - 1.).abs() < 1e-12);
    let f = ws.compute_with(&GeometryProbe::new(loaded.probe), &obstructions, 45.);
    assert!((f.winter - 1.).abs() < 1e-12);

    // An explicit probe overrides the window's own settings
    let f = ws.compute_with(&GeometryProbe::new(ProbeConfig::default()), &obstructions, 45.);
    assert!(f.winter < 1.);
    Ok(())
}

#[test]
fn test_facade_batch() -> Result<()> {
    init_logging();
    let obstructions = vec![neighbour(12., 15.)?];
    let mut windows = (0..8)
        .map(|i| south_window(&format!("w{i}"), i as f64 * 2.).map(WindowShading::new))
        .collect::<Result<Vec<_>>>()?;
    let factors = compute_all(&mut windows, &GeometryProbe::default(), &obstructions, 55.);

    // The neighbour spans the whole facade, every window sees the same horizon
    for f in &factors {
        assert!((f.winter - factors[0].winter).abs() < 1e-9);
        assert!(f.winter < 1.);
    }
    Ok(())
}
