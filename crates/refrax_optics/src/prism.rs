//! Dispersion of a light beam through a prism.
//!
//! A single incoming beam is refracted twice (into the prism through the entry
//! edge, out through the exit edge) once per sampled refractive index. Sweeping
//! the index over a small range fans the outgoing beam into a spectrum.
//!
//! Angles are signed and measured from each edge normal oriented along the
//! direction of travel, so the entry and exit edges may be given in either
//! winding.

use std::f64::consts::FRAC_PI_2;

use rayon::prelude::*;
use refrax_math::{line_intersection, rotate_vector, DVec3, Interval, Ray, FRAME_WIDTH};
use serde::{Deserialize, Serialize};

use crate::error::{OpticsError, OpticsResult, Surface};
use crate::snell::{emergence_angle, incidence_angle, refraction_angle};
use crate::spectrum::{spectral_color, Color};

/// One face of a prism, as a line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: DVec3,
    pub end: DVec3,
}

impl Edge {
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    /// `end - start`
    pub fn vector(&self) -> DVec3 {
        self.end - self.start
    }

    /// Unit direction from start to end.
    pub fn direction(&self) -> DVec3 {
        self.vector().normalize_or_zero()
    }

    /// Unit normal: the direction rotated a quarter turn counter-clockwise.
    pub fn normal(&self) -> DVec3 {
        rotate_vector(self.direction(), FRAC_PI_2)
    }

    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    pub fn center(&self) -> DVec3 {
        self.point_at(0.5)
    }

    /// Point `alpha` of the way from start to end.
    pub fn point_at(&self, alpha: f64) -> DVec3 {
        self.start + alpha * self.vector()
    }

    /// Distance from `point` to the infinite line through this edge (xy plane).
    pub fn distance_to_line(&self, point: DVec3) -> f64 {
        (point - self.start).dot(self.normal()).abs()
    }
}

/// A triangular prism seen end on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prism {
    pub vertices: [DVec3; 3],
}

impl Prism {
    pub fn new(vertices: [DVec3; 3]) -> Self {
        Self { vertices }
    }

    /// Equilateral prism pointing up, `height` tall, with its bounding box centered on `center`.
    ///
    /// Vertices run counter-clockwise from the apex.
    pub fn equilateral(height: f64, center: DVec3) -> Self {
        let half_side = height / 3f64.sqrt();
        let half_height = height / 2.0;
        Self::new([
            center + DVec3::new(0.0, half_height, 0.0),
            center + DVec3::new(-half_side, -half_height, 0.0),
            center + DVec3::new(half_side, -half_height, 0.0),
        ])
    }

    /// Left face, apex to lower left.
    pub fn entry_edge(&self) -> Edge {
        Edge::new(self.vertices[0], self.vertices[1])
    }

    /// Right face, apex to lower right.
    pub fn exit_edge(&self) -> Edge {
        Edge::new(self.vertices[0], self.vertices[2])
    }

    /// All three faces, for drawing the outline.
    pub fn edges(&self) -> [Edge; 3] {
        [
            self.entry_edge(),
            Edge::new(self.vertices[1], self.vertices[2]),
            self.exit_edge(),
        ]
    }
}

/// Lengths of the visual lead-in and lead-out segments of each beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    /// Length drawn before the entry point
    pub pre_length: f64,
    /// Length drawn after the exit point
    pub post_length: f64,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            pre_length: 0.5 * FRAME_WIDTH,
            post_length: 0.75 * FRAME_WIDTH,
        }
    }
}

/// The path of light at one refractive index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrismPath {
    pub entry_point: DVec3,
    /// Unit direction inside the prism
    pub internal_direction: DVec3,
    pub exit_point: DVec3,
    /// Unit direction after leaving the prism
    pub exit_direction: DVec3,
}

/// One colored beam of the dispersed fan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Beam {
    pub index: f64,
    /// Position of `index` within the sampled range, 0 to 1
    pub alpha: f64,
    pub color: Color,
    /// Lead-in start, entry point, exit point, lead-out end
    pub points: [DVec3; 4],
    pub exit_direction: DVec3,
}

impl Beam {
    pub fn entry_point(&self) -> DVec3 {
        self.points[1]
    }

    pub fn exit_point(&self) -> DVec3 {
        self.points[2]
    }

    /// Segments of the polyline, in drawing order.
    pub fn segments(&self) -> impl Iterator<Item = (DVec3, DVec3)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Where the incoming beam meets the entry edge's line.
pub fn entry_point(incidence: &Ray, entry_edge: &Edge) -> OpticsResult<DVec3> {
    line_intersection(
        incidence.origin,
        incidence.direction,
        entry_edge.start,
        entry_edge.vector(),
    )
    .ok_or(OpticsError::ParallelLines {
        surface: Surface::Entry,
    })
}

/// Trace light of a single refractive index through both edges.
///
/// The exit edge is treated as an infinite line.
pub fn trace_path(
    index: f64,
    incidence: &Ray,
    entry_edge: &Edge,
    exit_edge: &Edge,
) -> OpticsResult<PrismPath> {
    let incidence = incidence.normalized();
    let entry_point = entry_point(&incidence, entry_edge)?;

    let (entry_normal, theta1) = incidence_angle(entry_edge.normal(), incidence.direction);
    let theta2 = refraction_angle(theta1, index)?;
    let internal_direction = rotate_vector(entry_normal, theta2);

    let exit_point = line_intersection(
        entry_point,
        internal_direction,
        exit_edge.start,
        exit_edge.vector(),
    )
    .ok_or(OpticsError::ParallelLines {
        surface: Surface::Exit,
    })?;

    let (exit_normal, theta3) = incidence_angle(exit_edge.normal(), internal_direction);
    let theta4 = emergence_angle(theta3, index)?;
    let exit_direction = rotate_vector(exit_normal, theta4);

    Ok(PrismPath {
        entry_point,
        internal_direction,
        exit_point,
        exit_direction,
    })
}

/// Trace one sample and build its beam polyline.
pub fn trace_beam(
    index: f64,
    alpha: f64,
    incidence: &Ray,
    entry_edge: &Edge,
    exit_edge: &Edge,
    options: &TraceOptions,
) -> OpticsResult<Beam> {
    let path = trace_path(index, incidence, entry_edge, exit_edge)?;
    let incoming = incidence.direction.normalize_or_zero();
    Ok(Beam {
        index,
        alpha,
        color: spectral_color(alpha),
        points: [
            path.entry_point - options.pre_length * incoming,
            path.entry_point,
            path.exit_point,
            path.exit_point + options.post_length * path.exit_direction,
        ],
        exit_direction: path.exit_direction,
    })
}

/// Refract a beam through a prism at `n_samples` indices spread evenly over
/// `[min_index, max_index]`, with default lead-in and lead-out lengths.
///
/// Returns one beam per index, lowest index first. If any sample fails
/// (total internal reflection or a parallel edge), the first failure in
/// index order is returned.
pub fn refract_through_prism(
    min_index: f64,
    max_index: f64,
    n_samples: usize,
    incidence: &Ray,
    entry_edge: &Edge,
    exit_edge: &Edge,
) -> OpticsResult<Vec<Beam>> {
    refract_through_prism_with(
        Interval::new(min_index, max_index),
        n_samples,
        incidence,
        entry_edge,
        exit_edge,
        &TraceOptions::default(),
    )
}

/// [`refract_through_prism`] with explicit trace options.
///
/// All or nothing: a single sample that fails, for instance by total
/// internal reflection at the exit face, fails the whole fan. Use
/// [`refract_through_prism_each`] to keep the samples that do refract.
pub fn refract_through_prism_with(
    indices: Interval,
    n_samples: usize,
    incidence: &Ray,
    entry_edge: &Edge,
    exit_edge: &Edge,
    options: &TraceOptions,
) -> OpticsResult<Vec<Beam>> {
    let results =
        refract_through_prism_each(indices, n_samples, incidence, entry_edge, exit_edge, options)?;

    // Collected in index order, so the first error is deterministic
    let beams = results.into_iter().collect::<OpticsResult<Vec<_>>>()?;
    log::debug!(
        "traced {} beams over indices [{}, {}]",
        beams.len(),
        indices.min,
        indices.max
    );
    Ok(beams)
}

/// Trace every sample independently and report each outcome, lowest index
/// first.
///
/// Only invalid sweep parameters fail the call as a whole.
pub fn refract_through_prism_each(
    indices: Interval,
    n_samples: usize,
    incidence: &Ray,
    entry_edge: &Edge,
    exit_edge: &Edge,
    options: &TraceOptions,
) -> OpticsResult<Vec<OpticsResult<Beam>>> {
    if n_samples == 0 {
        return Err(OpticsError::InvalidParameter(
            "at least one index sample is required".into(),
        ));
    }
    if incidence.direction.length_squared() == 0.0 {
        return Err(OpticsError::InvalidParameter(
            "incidence ray has no direction".into(),
        ));
    }

    let samples = indices.linspace(n_samples);
    let last = (n_samples.max(2) - 1) as f64;

    Ok(samples
        .par_iter()
        .enumerate()
        .map(|(i, &index)| {
            trace_beam(
                index,
                i as f64 / last,
                incidence,
                entry_edge,
                exit_edge,
                options,
            )
        })
        .collect())
}
