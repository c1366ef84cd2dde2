//! OSGB36 national grid to WGS84 conversion
//!
//! Eastings/northings are first unprojected from the British National Grid
//! Transverse Mercator onto the Airy 1830 ellipsoid, then moved to WGS84 with a
//! seven-parameter Helmert shift through earth-centred cartesian coordinates.
//! The result is good to roughly 3 meters, which is plenty for site boundaries
//! of a few hundred meters.

use geo::Coord;

/// Reference ellipsoid given by its semi-axes
#[derive(Clone, Copy, Debug)]
struct Ellipsoid {
    /// Semi-major axis (meters)
    a: f64,
    /// Semi-minor axis (meters)
    b: f64,
}

impl Ellipsoid {
    /// First eccentricity squared
    #[inline]
    fn e2(&self) -> f64 {
        1.0 - (self.b * self.b) / (self.a * self.a)
    }

    /// Third flattening
    #[inline]
    fn n(&self) -> f64 {
        (self.a - self.b) / (self.a + self.b)
    }
}

const AIRY_1830: Ellipsoid = Ellipsoid {
    a: 6_377_563.396,
    b: 6_356_256.909,
};

const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    b: 6_356_752.314_245,
};

/// British National Grid projection parameters
mod grid {
    /// Scale factor on the central meridian
    pub const F0: f64 = 0.9996012717;
    /// True origin latitude (degrees)
    pub const LAT0: f64 = 49.0;
    /// True origin longitude (degrees)
    pub const LON0: f64 = -2.0;
    /// False easting (meters)
    pub const E0: f64 = 400_000.0;
    /// False northing (meters)
    pub const N0: f64 = -100_000.0;
}

/// Seven-parameter Helmert shift, position-vector convention
#[derive(Clone, Copy, Debug)]
struct Helmert {
    /// Translations (meters)
    tx: f64,
    ty: f64,
    tz: f64,
    /// Rotations (arc seconds)
    rx: f64,
    ry: f64,
    rz: f64,
    /// Scale (parts per million)
    s: f64,
}

const OSGB36_TO_WGS84: Helmert = Helmert {
    tx: 446.448,
    ty: -125.157,
    tz: 542.060,
    rx: 0.150,
    ry: 0.247,
    rz: 0.842,
    s: -20.489,
};

/// Convergence threshold for the iterative latitude solutions
const LAT_TOLERANCE_M: f64 = 0.00001;
const LAT_TOLERANCE_RAD: f64 = 1e-12;

/// Upper bound on iterations so NaN or wildly out-of-grid input still terminates
const MAX_ITERATIONS: usize = 100;

/// Convert OSGB36 eastings/northings (meters) to WGS84 (lon, lat) in degrees.
///
/// No bounds checking is done: values far outside the national grid still
/// produce a (meaningless) answer, and NaN in gives NaN out.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn osgb36_to_wgs84(eastings: f64, northings: f64) -> Coord<f64> {
    let (lat, lon) = grid_to_airy(eastings, northings);
    let cartesian = geodetic_to_cartesian(&AIRY_1830, lat, lon);
    let shifted = OSGB36_TO_WGS84.apply(cartesian);
    let (lat, lon) = cartesian_to_geodetic(&WGS84, shifted);

    Coord {
        x: lon.to_degrees(),
        y: lat.to_degrees(),
    }
}

/// Meridional arc from the true origin latitude to `phi` (radians)
fn meridional_arc(phi: f64) -> f64 {
    let n = AIRY_1830.n();
    let n2 = n * n;
    let n3 = n2 * n;
    let phi0 = grid::LAT0.to_radians();
    let dphi = phi - phi0;
    let sphi = phi + phi0;

    let ma = (1.0 + n + 1.25 * n2 + 1.25 * n3) * dphi;
    let mb = (3.0 * n + 3.0 * n2 + 21.0 / 8.0 * n3) * dphi.sin() * sphi.cos();
    let mc = (15.0 / 8.0 * n2 + 15.0 / 8.0 * n3) * (2.0 * dphi).sin() * (2.0 * sphi).cos();
    let md = 35.0 / 24.0 * n3 * (3.0 * dphi).sin() * (3.0 * sphi).cos();

    AIRY_1830.b * grid::F0 * (ma - mb + mc - md)
}

/// Inverse Transverse Mercator onto Airy 1830. Returns (lat, lon) in radians.
fn grid_to_airy(eastings: f64, northings: f64) -> (f64, f64) {
    let a = AIRY_1830.a;
    let e2 = AIRY_1830.e2();
    let af0 = a * grid::F0;

    // Iterate the footpoint latitude until the meridional arc matches the northing
    let mut phi = grid::LAT0.to_radians();
    let mut m = 0.0;
    for _ in 0..MAX_ITERATIONS {
        phi += (northings - grid::N0 - m) / af0;
        m = meridional_arc(phi);
        let residual = (northings - grid::N0 - m).abs();
        if residual < LAT_TOLERANCE_M || residual.is_nan() {
            break;
        }
    }

    let sin_phi = phi.sin();
    let denom = 1.0 - e2 * sin_phi * sin_phi;
    let nu = af0 / denom.sqrt();
    let rho = af0 * (1.0 - e2) / denom.powf(1.5);
    let eta2 = nu / rho - 1.0;

    let tan_phi = phi.tan();
    let t2 = tan_phi * tan_phi;
    let t4 = t2 * t2;
    let t6 = t4 * t2;
    let sec_phi = 1.0 / phi.cos();
    let nu3 = nu * nu * nu;
    let nu5 = nu3 * nu * nu;
    let nu7 = nu5 * nu * nu;

    let vii = tan_phi / (2.0 * rho * nu);
    let viii = tan_phi / (24.0 * rho * nu3) * (5.0 + 3.0 * t2 + eta2 - 9.0 * t2 * eta2);
    let ix = tan_phi / (720.0 * rho * nu5) * (61.0 + 90.0 * t2 + 45.0 * t4);
    let x = sec_phi / nu;
    let xi = sec_phi / (6.0 * nu3) * (nu / rho + 2.0 * t2);
    let xii = sec_phi / (120.0 * nu5) * (5.0 + 28.0 * t2 + 24.0 * t4);
    let xiia = sec_phi / (5040.0 * nu7) * (61.0 + 662.0 * t2 + 1320.0 * t4 + 720.0 * t6);

    let de = eastings - grid::E0;
    let de2 = de * de;
    let de3 = de2 * de;
    let de4 = de3 * de;
    let de5 = de4 * de;
    let de6 = de5 * de;
    let de7 = de6 * de;

    let lat = phi - vii * de2 + viii * de4 - ix * de6;
    let lon = grid::LON0.to_radians() + x * de - xi * de3 + xii * de5 - xiia * de7;

    (lat, lon)
}

/// Geodetic (lat, lon) radians at zero height to earth-centred cartesian (x, y, z)
fn geodetic_to_cartesian(ellipsoid: &Ellipsoid, lat: f64, lon: f64) -> [f64; 3] {
    let e2 = ellipsoid.e2();
    let sin_lat = lat.sin();
    let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    [
        nu * lat.cos() * lon.cos(),
        nu * lat.cos() * lon.sin(),
        (1.0 - e2) * nu * sin_lat,
    ]
}

/// Earth-centred cartesian (x, y, z) to geodetic (lat, lon) radians
fn cartesian_to_geodetic(ellipsoid: &Ellipsoid, [x, y, z]: [f64; 3]) -> (f64, f64) {
    let e2 = ellipsoid.e2();
    let p = (x * x + y * y).sqrt();

    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (z + e2 * nu * sin_lat).atan2(p);
        let delta = (next - lat).abs();
        lat = next;
        if delta < LAT_TOLERANCE_RAD || delta.is_nan() {
            break;
        }
    }

    (lat, y.atan2(x))
}

impl Helmert {
    fn apply(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        let s1 = self.s / 1e6 + 1.0;
        let rx = (self.rx / 3600.0).to_radians();
        let ry = (self.ry / 3600.0).to_radians();
        let rz = (self.rz / 3600.0).to_radians();

        [
            self.tx + x * s1 - y * rz + z * ry,
            self.ty + x * rz + y * s1 - z * rx,
            self.tz - x * ry + y * rx + z * s1,
        ]
    }
}
