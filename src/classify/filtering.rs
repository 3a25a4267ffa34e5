use crate::taxonomy::Node;

/// Candidates to offer below a node of depth `current_depth`.
///
/// Source data sometimes flattens several generations into one `children`
/// list. Only the shallowest generation deeper than the current node is
/// offered; when nothing is deeper the list is offered unfiltered.
pub fn next_level(current_depth: usize, candidates: &[Node]) -> Vec<&Node> {
    let min_deeper = candidates
        .iter()
        .map(Node::depth)
        .filter(|depth| *depth > current_depth)
        .min();

    match min_deeper {
        Some(wanted) => candidates
            .iter()
            .filter(|node| node.depth() == wanted)
            .collect(),
        None => candidates.iter().collect(),
    }
}
