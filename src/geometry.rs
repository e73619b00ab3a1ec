//! Geometrische Hilfsfunktionen für 3D-Kollisionserkennung im Container.
//!
//! Alle Koordinaten sind ganzzahlige Millimeter, daher vergleichen die
//! Funktionen exakt und ohne Toleranzen.

use crate::model::Placement;
use crate::types::Pos;

/// Prüft, ob zwei platzierte Objekte sich räumlich überschneiden.
///
/// Verwendet Axis-Aligned Bounding Box (AABB) Kollisionserkennung.
/// Zwei Boxen überschneiden sich NICHT, wenn sie in mindestens einer Achse
/// getrennt sind.
///
/// # Parameter
/// * `a` - Erstes platziertes Objekt
/// * `b` - Zweites platziertes Objekt
///
/// # Rückgabewert
/// `true` wenn sich die Objekte überschneiden, sonst `false`
pub fn intersects(a: &Placement, b: &Placement) -> bool {
    let (ax, ay, az) = (a.position.x, a.position.y, a.position.z);
    let ad = a.dims();
    let (bx, by, bz) = (b.position.x, b.position.y, b.position.z);
    let bd = b.dims();

    // Separating Axis Theorem: Objekte überschneiden sich NICHT, wenn
    // sie in irgendeiner Achse vollständig getrennt sind
    !(ax + ad.length <= bx
        || bx + bd.length <= ax
        || ay + ad.width <= by
        || by + bd.width <= ay
        || az + ad.height <= bz
        || bz + bd.height <= az)
}

/// Berechnet die Überlappung zweier Intervalle in einer Dimension.
///
/// # Parameter
/// * `a1` - Start des ersten Intervalls
/// * `a2` - Ende des ersten Intervalls
/// * `b1` - Start des zweiten Intervalls
/// * `b2` - Ende des zweiten Intervalls
///
/// # Rückgabewert
/// Länge der Überlappung, mindestens 0
pub fn overlap_1d(a1: i64, a2: i64, b1: i64, b2: i64) -> i64 {
    (a2.min(b2) - a1.max(b1)).max(0)
}

/// Prüft, ob ein Punkt innerhalb eines platzierten Objekts liegt (inklusive Rand).
///
/// # Parameter
/// * `point` - Der zu prüfende Punkt
/// * `placement` - Das platzierte Objekt
///
/// # Rückgabewert
/// `true` wenn der Punkt innerhalb des Objekts liegt
pub fn point_inside(point: Pos, placement: &Placement) -> bool {
    let p = placement.position;
    let d = placement.dims();

    point.x >= p.x
        && point.x <= p.x + d.length
        && point.y >= p.y
        && point.y <= p.y + d.width
        && point.z >= p.z
        && point.z <= p.z + d.height
}
