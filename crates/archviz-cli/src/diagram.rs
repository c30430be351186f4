//! The "Vulnerable API protected" architecture diagram.
//!
//! A GitHub repository triggers Cloud Build, which deploys a WAF and the API
//! it protects into the same GCP project. An outside attacker can only reach
//! the API through the WAF.

use archviz::{ArchvizError, DiagramBuilder, Edge, Scope, semantic::NodeCategory};

pub const TITLE: &str = "Vulnerable API protected";

/// Builder carrying the diagram's title and graph attributes.
pub fn builder() -> DiagramBuilder {
    DiagramBuilder::new(TITLE).with_graph_attr("pad", "0")
}

/// Declares the nodes, the project cluster and the edges.
pub fn define(scope: &mut Scope<'_>) -> Result<(), ArchvizError> {
    let github = scope.node(NodeCategory::Github, "GitHub repo");

    let (build, waf, api) = scope.cluster("API project", |project| {
        (
            project.node(NodeCategory::Build, "Cloud Build"),
            project.node(NodeCategory::Run, "WAF"),
            project.node(NodeCategory::Run, "API"),
        )
    });

    let user = scope.node(NodeCategory::User, "Hacker");

    scope.connect(
        github,
        build,
        Edge::new().label("Build Trigger").color("black"),
    )?;
    scope.connect(build, waf, Edge::new().label("Deploy").style("dotted"))?;
    scope.connect(build, api, Edge::new().label("Deploy").style("dotted"))?;
    scope.connect(waf, api, Edge::undirected())?;
    scope.connect(user, waf, Edge::undirected().label("https"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use archviz::semantic::{EdgeDirection, EdgeStyle};

    use super::*;

    #[test]
    fn test_nodes_in_declaration_order() {
        let diagram = builder().define(define).unwrap();
        let labels: Vec<_> = diagram.nodes().iter().map(|node| node.label()).collect();
        assert_eq!(labels, ["GitHub repo", "Cloud Build", "WAF", "API", "Hacker"]);
    }

    #[test]
    fn test_project_cluster_membership() {
        let diagram = builder().define(define).unwrap();
        assert_eq!(diagram.clusters().len(), 1);
        let project = &diagram.clusters()[0];
        assert_eq!(project.label(), "API project");

        for (label, inside) in [
            ("GitHub repo", false),
            ("Cloud Build", true),
            ("WAF", true),
            ("API", true),
            ("Hacker", false),
        ] {
            let node = diagram.node_by_label(label).unwrap();
            assert_eq!(diagram.is_in_cluster(node, project.id()), inside, "{label}");
        }
    }

    #[test]
    fn test_edges() {
        let diagram = builder().define(define).unwrap();
        let edges = diagram.edges();
        assert_eq!(edges.len(), 5);

        let labels: Vec<_> = edges.iter().map(|edge| edge.label()).collect();
        assert_eq!(
            labels,
            [
                Some("Build Trigger"),
                Some("Deploy"),
                Some("Deploy"),
                None,
                Some("https"),
            ]
        );

        assert!(edges[0].color().is_some());
        assert_eq!(edges[1].style(), EdgeStyle::Dotted);
        assert_eq!(edges[2].style(), EdgeStyle::Dotted);
        assert_eq!(edges[0].direction(), EdgeDirection::Forward);
        assert_eq!(edges[3].direction(), EdgeDirection::None);
        assert_eq!(edges[4].direction(), EdgeDirection::None);
    }

    #[test]
    fn test_zero_padding() {
        let diagram = builder().define(define).unwrap();
        assert_eq!(diagram.attributes().pad_points(), 0.0);
    }
}
