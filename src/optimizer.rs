//! Standard-Engine für die Beladung eines einzelnen Containers.
//!
//! Dieses Modul implementiert einen deterministischen, heuristischen
//! Algorithmus zur Platzierung einer Item-Sequenz in genau einem Container
//! unter Berücksichtigung von:
//! - Gewichtsgrenze des Containers
//! - Stabilität und Unterstützung (Auflagefläche, getragener Mittelpunkt)
//! - Schwerpunkt-Balance
//!
//! Die Items werden strikt in Sequenz-Reihenfolge verarbeitet und nie
//! umsortiert; alle Koordinaten sind ganzzahlige Millimeter.

use crate::geometry::{intersects, overlap_1d, point_inside};
use crate::model::{ContainerSpec, ItemSpec, LoadPlanRequest, Orientation, Placement};
use crate::planner::{
    LoadPlanReport, LoadPlanner, NotLoadedItem, NotLoadedReason, PlannerError,
};
use crate::types::{CenterOfMassCalculator, Dims, EPSILON_WEIGHT, Pos, Weighted};

/// Konfiguration für den Platzierungsalgorithmus.
///
/// Enthält alle Raster- und Grenzwerte zur Steuerung des Suchverhaltens.
#[derive(Copy, Clone, Debug)]
pub struct PlacementConfig {
    /// Schrittweite des Positionsrasters in mm (kleiner = genauer, aber langsamer)
    pub grid_step: i64,
    /// Minimaler Anteil der Grundfläche, der unterstützt sein muss (0.0 bis 1.0)
    pub support_ratio: f64,
    /// Maximale erlaubte Abweichung des Schwerpunkts vom Mittelpunkt
    /// (als Anteil der halben Diagonale)
    pub balance_limit_ratio: f64,
    /// Erlaubt die 90°-Drehung der Grundfläche um die Hochachse
    pub allow_item_rotation: bool,
}

impl PlacementConfig {
    pub const DEFAULT_GRID_STEP: i64 = 50;
    pub const DEFAULT_SUPPORT_RATIO: f64 = 0.6;
    pub const DEFAULT_BALANCE_LIMIT_RATIO: f64 = 0.45;
    pub const DEFAULT_ALLOW_ITEM_ROTATION: bool = true;

    /// Erstellt einen Builder für benutzerdefinierte Konfiguration.
    pub fn builder() -> PlacementConfigBuilder {
        PlacementConfigBuilder::default()
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            grid_step: Self::DEFAULT_GRID_STEP,
            support_ratio: Self::DEFAULT_SUPPORT_RATIO,
            balance_limit_ratio: Self::DEFAULT_BALANCE_LIMIT_RATIO,
            allow_item_rotation: Self::DEFAULT_ALLOW_ITEM_ROTATION,
        }
    }
}

/// Builder für [`PlacementConfig`].
#[derive(Clone, Debug, Default)]
pub struct PlacementConfigBuilder {
    config: PlacementConfig,
}

impl PlacementConfigBuilder {
    /// Setzt die Raster-Schrittweite in mm.
    pub fn grid_step(mut self, step: i64) -> Self {
        self.config.grid_step = step;
        self
    }

    /// Setzt die minimale Unterstützungsrate.
    pub fn support_ratio(mut self, ratio: f64) -> Self {
        self.config.support_ratio = ratio;
        self
    }

    /// Setzt das Balance-Limit als Anteil der halben Diagonale.
    pub fn balance_limit_ratio(mut self, ratio: f64) -> Self {
        self.config.balance_limit_ratio = ratio;
        self
    }

    /// Erlaubt oder verbietet die Item-Rotation.
    pub fn allow_item_rotation(mut self, allow: bool) -> Self {
        self.config.allow_item_rotation = allow;
        self
    }

    /// Erstellt die finale Konfiguration.
    pub fn build(self) -> PlacementConfig {
        self.config
    }
}

/// Deterministische Rastersuche als Standard-Implementierung von
/// [`LoadPlanner`].
#[derive(Clone, Debug, Default)]
pub struct GridPlanner {
    config: PlacementConfig,
}

impl GridPlanner {
    /// Erstellt einen Planer mit der gegebenen Konfiguration.
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// Erstellt einen Planer mit Default-Konfiguration.
    pub fn with_defaults() -> Self {
        Self::default()
    }
}

impl LoadPlanner for GridPlanner {
    fn plan(&self, request: &LoadPlanRequest) -> Result<LoadPlanReport, PlannerError> {
        let container = request.container;
        let mut placements: Vec<Placement> = Vec::new();
        let mut not_loaded: Vec<NotLoadedItem> = Vec::new();
        let mut loaded_weight = 0.0;

        for item in &request.items {
            match find_stable_position(item, &container, &placements, loaded_weight, &self.config)
            {
                Some((position, orientation)) => {
                    loaded_weight += item.weight;
                    placements.push(Placement::new(item.clone(), position, orientation));
                }
                None => {
                    let reason =
                        reject_reason(item, &container, loaded_weight, &self.config);
                    not_loaded.push(NotLoadedItem {
                        item: item.clone(),
                        reason,
                    });
                }
            }
        }

        Ok(LoadPlanReport {
            container,
            placements,
            not_loaded,
        })
    }
}

/// Bestimmt, warum ein Item nicht platziert werden konnte.
///
/// Reihenfolge: Gewicht vor Abmessungen vor Stabilität.
fn reject_reason(
    item: &ItemSpec,
    container: &ContainerSpec,
    loaded_weight: f64,
    config: &PlacementConfig,
) -> NotLoadedReason {
    if loaded_weight + item.weight > container.max_weight + EPSILON_WEIGHT {
        return NotLoadedReason::TooHeavyForContainer;
    }

    let dims = item.dims();
    let dimension_blocked = orientations(dims, config)
        .iter()
        .all(|orientation| !orientation.apply(dims).fits_within(&container.dims()));
    if dimension_blocked {
        return NotLoadedReason::DimensionsExceedContainer;
    }

    NotLoadedReason::NoStablePosition
}

/// Liefert die zu prüfenden Orientierungen für eine Grundfläche.
fn orientations(dims: Dims, config: &PlacementConfig) -> Vec<Orientation> {
    if config.allow_item_rotation && dims.rotation_matters() {
        vec![Orientation::AsGiven, Orientation::Rotated]
    } else {
        vec![Orientation::AsGiven]
    }
}

/// Findet eine stabile Position für ein Item im Container.
///
/// Durchsucht alle Z-Ebenen (Boden + Oberseiten platzierter Items), Y- und
/// X-Rasterpositionen sowie die erlaubten Orientierungen und bewertet jede
/// kollisionsfreie, stabile Position.
///
/// # Parameter
/// * `item` - Das zu platzierende Item
/// * `container` - Der Container
/// * `placed` - Bereits platzierte Items
/// * `loaded_weight` - Summe der bereits platzierten Gewichte in kg
/// * `config` - Konfigurationsparameter
///
/// # Rückgabewert
/// `Some((position, orientation))` bei erfolgreicher Platzierung, sonst `None`
fn find_stable_position(
    item: &ItemSpec,
    container: &ContainerSpec,
    placed: &[Placement],
    loaded_weight: f64,
    config: &PlacementConfig,
) -> Option<(Pos, Orientation)> {
    let dims = item.dims();
    if !dims.is_valid() {
        return None;
    }
    if loaded_weight + item.weight > container.max_weight + EPSILON_WEIGHT {
        return None;
    }

    // Relevante Z-Ebenen: Boden + Oberseiten aller platzierten Items
    let mut z_layers: Vec<i64> = placed.iter().map(Placement::top_z).collect();
    z_layers.push(0);
    z_layers.sort_unstable();
    z_layers.dedup();

    let balance_limit = balance_limit(container, config);

    let mut best_in_limit: Option<(Pos, Orientation, PlacementScore)> = None;
    let mut best_any: Option<(Pos, Orientation, PlacementScore)> = None;

    for orientation in orientations(dims, config) {
        let oriented = orientation.apply(dims);
        if !oriented.fits_within(&container.dims()) {
            continue;
        }

        let xs = axis_positions(container.length, oriented.length, config.grid_step);
        let ys = axis_positions(container.width, oriented.width, config.grid_step);

        // Kandidat einmal je Orientierung, Position wird im Raster mutiert
        let mut candidate = Placement::new(item.clone(), Pos::zero(), orientation);

        for &z in &z_layers {
            if z + oriented.height > container.height {
                continue;
            }

            for &y in &ys {
                if y + oriented.width > container.width {
                    continue;
                }

                for &x in &xs {
                    if x + oriented.length > container.length {
                        continue;
                    }

                    candidate.position = Pos::new(x, y, z);

                    if placed.iter().any(|p| intersects(p, &candidate)) {
                        continue;
                    }

                    // Oberhalb des Bodens: Stabilität prüfen
                    if z > 0 {
                        if !has_sufficient_support(&candidate, placed, config) {
                            continue;
                        }
                        if !supports_weight_correctly(&candidate, placed) {
                            continue;
                        }
                        if !is_center_supported(&candidate, placed) {
                            // Verhindert Überhänge ohne getragenen Schwerpunkt
                            continue;
                        }
                    }

                    let balance = balance_after(container, placed, &candidate);
                    let score = PlacementScore { z, y, x, balance };

                    update_best(&mut best_any, candidate.position, orientation, score);
                    if balance <= balance_limit {
                        update_best(&mut best_in_limit, candidate.position, orientation, score);
                    }
                }
            }
        }
    }

    best_in_limit
        .or(best_any)
        .map(|(pos, orientation, _)| (pos, orientation))
}

/// Generiert die Rasterpositionen entlang einer Achse.
///
/// # Parameter
/// * `container_len` - Länge des Containers in dieser Dimension
/// * `object_len` - Länge des Objekts in dieser Dimension
/// * `step` - Schrittweite des Rasters in mm
fn axis_positions(container_len: i64, object_len: i64, step: i64) -> Vec<i64> {
    let step = step.max(1);
    let max_pos = (container_len - object_len).max(0);
    let mut positions = Vec::new();

    let mut pos = 0;
    while pos <= max_pos {
        positions.push(pos);
        pos += step;
    }

    // Die Anschlagsposition an der Containerwand ist immer Kandidat
    if positions.last().copied() != Some(max_pos) {
        positions.push(max_pos);
    }

    positions
}

/// Prüft, ob ein Item ausreichend unterstützt wird.
///
/// Berechnet den Anteil der Grundfläche, der auf Oberseiten platzierter
/// Items aufliegt.
fn has_sufficient_support(
    candidate: &Placement,
    placed: &[Placement],
    config: &PlacementConfig,
) -> bool {
    if candidate.position.z == 0 {
        return true;
    }

    let dims = candidate.dims();
    let base_area = dims.base_area();
    if base_area <= 0 {
        return false;
    }

    let mut support_area: i64 = 0;
    for p in placed {
        if p.top_z() != candidate.position.z {
            continue;
        }
        support_area += footprint_overlap(candidate, p);
    }

    (support_area as f64 / base_area as f64) >= config.support_ratio
}

/// Prüft, ob kein schwereres Item auf einem leichteren liegt.
fn supports_weight_correctly(candidate: &Placement, placed: &[Placement]) -> bool {
    if candidate.position.z == 0 {
        return true;
    }

    let mut has_support = false;
    for p in placed {
        if p.top_z() != candidate.position.z {
            continue;
        }
        if footprint_overlap(candidate, p) <= 0 {
            continue;
        }

        has_support = true;
        if p.item.weight + EPSILON_WEIGHT < candidate.item.weight {
            return false;
        }
    }

    has_support
}

/// Prüft, ob der projizierte Mittelpunkt der Grundfläche getragen wird.
///
/// Einfache, robuste Stabilitätsheuristik: mindestens ein tragendes Item muss
/// direkt unter dem Mittelpunkt liegen.
fn is_center_supported(candidate: &Placement, placed: &[Placement]) -> bool {
    if candidate.position.z == 0 {
        return true;
    }

    let dims = candidate.dims();
    let center = Pos::new(
        candidate.position.x + dims.length / 2,
        candidate.position.y + dims.width / 2,
        candidate.position.z,
    );

    placed
        .iter()
        .filter(|p| p.top_z() == candidate.position.z)
        .any(|p| point_inside(center, p))
}

/// Überlappung der Grundflächen zweier Platzierungen in mm².
fn footprint_overlap(a: &Placement, b: &Placement) -> i64 {
    let ad = a.dims();
    let bd = b.dims();
    let over_x = overlap_1d(
        a.position.x,
        a.position.x + ad.length,
        b.position.x,
        b.position.x + bd.length,
    );
    let over_y = overlap_1d(
        a.position.y,
        a.position.y + ad.width,
        b.position.y,
        b.position.y + bd.width,
    );
    over_x * over_y
}

/// Berechnet die Schwerpunktabweichung nach Hinzufügen eines Items.
///
/// Gewichteter Schwerpunkt aller Items (inklusive Kandidat) und dessen
/// Distanz zum geometrischen Mittelpunkt des Containers, in mm.
fn balance_after(container: &ContainerSpec, placed: &[Placement], candidate: &Placement) -> f64 {
    let mut calc = CenterOfMassCalculator::new();
    for p in placed {
        let (cx, cy) = p.center_xy();
        calc.add_point(cx, cy, p.weight());
    }
    let (cx, cy) = candidate.center_xy();
    calc.add_point(cx, cy, candidate.weight());

    calc.distance_to((
        container.length as f64 / 2.0,
        container.width as f64 / 2.0,
    ))
}

/// Maximal erlaubte Schwerpunktabweichung in mm.
fn balance_limit(container: &ContainerSpec, config: &PlacementConfig) -> f64 {
    let half_x = container.length as f64 / 2.0;
    let half_y = container.width as f64 / 2.0;
    (half_x * half_x + half_y * half_y).sqrt() * config.balance_limit_ratio
}

/// Bewertung einer Platzierungsposition.
///
/// Niedrigere Werte sind besser (z zuerst, dann y, dann x, dann balance).
#[derive(Clone, Copy, Debug)]
struct PlacementScore {
    z: i64,
    y: i64,
    x: i64,
    balance: f64,
}

impl PlacementScore {
    fn is_better_than(&self, other: &PlacementScore) -> bool {
        (self.z, self.y, self.x)
            .cmp(&(other.z, other.y, other.x))
            .then_with(|| {
                self.balance
                    .partial_cmp(&other.balance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .is_lt()
    }
}

/// Aktualisiert die beste gefundene Position.
fn update_best(
    best: &mut Option<(Pos, Orientation, PlacementScore)>,
    position: Pos,
    orientation: Orientation,
    score: PlacementScore,
) {
    match best {
        None => *best = Some((position, orientation, score)),
        Some((_, _, current)) => {
            if score.is_better_than(current) {
                *best = Some((position, orientation, score));
            }
        }
    }
}
