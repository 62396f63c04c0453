//! Hand-off to an external visualizer.
//!
//! keytree does not draw anything. A [`Renderer`] receives the tree's edges
//! and a layout hint once per request and produces whatever artifact it
//! likes (an image, a DOT file, a UI update).

use keytree_core::{Edge, KeyTree, Layout};
use tracing::debug;

/// External visualization capability.
pub trait Renderer {
    type Artifact;
    type Error;

    fn render(&mut self, edges: &[Edge], layout: &Layout) -> Result<Self::Artifact, Self::Error>;
}

/// Render a whole tree with a single renderer call.
///
/// Returns `Ok(None)` for the empty tree without calling the renderer.
pub fn render_tree<R: Renderer>(
    tree: &KeyTree,
    renderer: &mut R,
) -> Result<Option<R::Artifact>, R::Error> {
    if tree.is_empty() {
        return Ok(None);
    }

    let edges = tree.edges();
    let layout = tree.layout();
    debug!(edges = edges.len(), nodes = layout.len(), "rendering tree");
    renderer.render(&edges, &layout).map(Some)
}
