//! Button-driven vertex selection
//!
//! A staged alternative to free clicking: the user picks among the vertices
//! of a mesh, one stage at a time. Each stage must be requested before a
//! vertex is accepted, and stages only open in order.

use glam::Vec3;
use sa_core::ray::ray_sphere_intersection;
use sa_core::{Frame, Ray, SurfaceId, TriangleMesh};

use crate::selection::{Anchor, CAPACITY};
use crate::session::MeasurementSession;

/// Which point the workflow is waiting for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionStage {
    #[default]
    Idle,
    AwaitingFirst,
    AwaitingSecond,
    AwaitingThird,
}

impl SelectionStage {
    /// Number of points that must already be placed for this stage
    pub fn required_count(&self) -> Option<usize> {
        match self {
            SelectionStage::Idle => None,
            SelectionStage::AwaitingFirst => Some(0),
            SelectionStage::AwaitingSecond => Some(1),
            SelectionStage::AwaitingThird => Some(2),
        }
    }

    fn for_count(count: usize) -> Option<Self> {
        match count {
            0 => Some(SelectionStage::AwaitingFirst),
            1 => Some(SelectionStage::AwaitingSecond),
            2 => Some(SelectionStage::AwaitingThird),
            _ => None,
        }
    }
}

/// A pickable mesh vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexSite {
    /// Index of the site within its [`VertexSites`]
    pub index: usize,
    /// World-space position
    pub position: Vec3,
    pub anchor: Option<Anchor>,
}

/// Pickable sites for every vertex of one or more meshes
#[derive(Debug, Clone, Default)]
pub struct VertexSites {
    sites: Vec<VertexSite>,
}

impl VertexSites {
    pub fn new() -> Self {
        Self::default()
    }

    /// One site per vertex of `mesh` placed under `frame`
    pub fn from_mesh(mesh: &TriangleMesh, frame: &Frame, surface: Option<SurfaceId>) -> Self {
        let mut sites = Self::new();
        sites.extend_from_mesh(mesh, frame, surface);
        sites
    }

    pub fn extend_from_mesh(
        &mut self,
        mesh: &TriangleMesh,
        frame: &Frame,
        surface: Option<SurfaceId>,
    ) {
        let anchor = surface.map(|surface| Anchor {
            surface,
            frame: *frame,
        });
        for position in mesh.world_vertices(frame) {
            let index = self.sites.len();
            self.sites.push(VertexSite {
                index,
                position,
                anchor,
            });
        }
    }

    /// Nearest site whose pick sphere of `radius` is hit by `ray`
    pub fn pick(&self, ray: &Ray, radius: f32) -> Option<&VertexSite> {
        self.sites
            .iter()
            .filter_map(|site| ray_sphere_intersection(ray, site.position, radius).map(|t| (site, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(site, _)| site)
    }

    pub fn get(&self, index: usize) -> Option<&VertexSite> {
        self.sites.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VertexSite> {
        self.sites.iter()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// Staged selection state layered over a [`MeasurementSession`]
#[derive(Debug, Clone, Default)]
pub struct StagedWorkflow {
    stage: SelectionStage,
    /// Site indices in selection order
    selected: Vec<usize>,
}

impl StagedWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> SelectionStage {
        self.stage
    }

    pub fn selected_sites(&self) -> &[usize] {
        &self.selected
    }

    /// Open `stage`. Accepted only when the stage matches the number of
    /// points already placed; requesting `Idle` always closes the stage.
    pub fn request(&mut self, stage: SelectionStage, session: &MeasurementSession) -> bool {
        self.sync(session);
        let accepted = match stage.required_count() {
            None => true,
            Some(count) => count == session.selection().len(),
        };
        if accepted {
            self.stage = stage;
        } else {
            tracing::debug!(?stage, placed = session.selection().len(), "Stage request rejected");
        }
        accepted
    }

    /// Offer a picked site to the open stage.
    ///
    /// The site is added when a stage is open, the point count matches it
    /// and the site is not already selected. The stage closes afterwards.
    pub fn register(&mut self, site: &VertexSite, session: &mut MeasurementSession) -> bool {
        self.sync(session);
        let Some(count) = self.stage.required_count() else {
            return false;
        };
        if count != session.selection().len() || self.selected.contains(&site.index) {
            return false;
        }

        if let Err(e) = session.place_point(site.position, site.anchor) {
            tracing::debug!("Vertex site ignored: {e}");
            return false;
        }
        self.selected.push(site.index);
        self.stage = SelectionStage::Idle;
        true
    }

    /// Remove the final point of a complete measurement so the third stage
    /// can be picked again.
    pub fn reset_last(&mut self, session: &mut MeasurementSession) -> bool {
        self.sync(session);
        if !session.selection().is_complete() {
            return false;
        }
        session.undo();
        self.selected.pop();
        self.stage = SelectionStage::Idle;
        true
    }

    /// The stage a UI should offer next, if any
    pub fn available_stage(&self, session: &MeasurementSession) -> Option<SelectionStage> {
        if self.stage != SelectionStage::Idle {
            return None;
        }
        SelectionStage::for_count(session.selection().len())
    }

    pub fn is_done(&self, session: &MeasurementSession) -> bool {
        session.selection().len() == CAPACITY
    }

    /// Forget sites whose points were removed through the session directly
    fn sync(&mut self, session: &MeasurementSession) {
        self.selected.truncate(session.selection().len());
    }
}
