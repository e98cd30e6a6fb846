//! Double-buffering behavior of a mounted tree across several passes.

use std::io;
use std::sync::{Arc, Mutex};

use serde_json::json;
use spark_fiber::{
    Element, ElementType, FiberTree, Flags, Opaque, Props, StateNode, TreeConfig, WorkTag,
};
use tracing_subscriber::fmt::MakeWriter;

// =============================================================================
// Log Capture
// =============================================================================

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut out) = self.0.lock() {
            out.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn with_captured_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, captured.contents())
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_mount_then_update_host_element() {
    let mut tree = FiberTree::new();

    // First pass: mount <div id="a">.
    let div = tree.create_fiber_from_element(&Element::host("div", json!({ "id": "a" })));
    {
        let fiber = tree.fiber(div).unwrap();
        assert_eq!(fiber.tag, WorkTag::HostComponent);
        assert_eq!(fiber.pending_props.get("id"), Some(&json!("a")));
        assert!(fiber.alternate().is_none());
    }
    tree.fiber_mut(div).unwrap().memoize();

    // Second pass: update to id="b".
    let before = tree.live_fibers();
    let wip = tree
        .create_work_in_progress(div, Props::from_json(json!({ "id": "b" })))
        .unwrap();

    assert_eq!(tree.live_fibers(), before + 1);
    let fiber = tree.fiber(wip).unwrap();
    assert_eq!(fiber.pending_props.get("id"), Some(&json!("b")));
    assert_eq!(
        fiber.memoized_props.as_ref().and_then(|p| p.get("id")),
        Some(&json!("a"))
    );
    assert!(fiber.flags.is_empty());
    assert!(fiber.subtree_flags.is_empty());
    assert_eq!(tree.alternate_of(wip).unwrap(), Some(div));
}

#[test]
fn test_many_passes_stay_within_two_generations() {
    let mut tree = FiberTree::new();
    let host_root = tree.create_fiber(WorkTag::HostRoot, Props::new(), None);
    let root = tree.create_fiber_root(Opaque::new("#app"), host_root).unwrap();

    let list = tree.create_fiber_from_element(&Element::host("ul", json!({})));
    let rows: Vec<_> = (0..3)
        .map(|i| tree.create_fiber_from_element(&Element::host("li", json!({ "n": i })).with_key(format!("{i}"))))
        .collect();
    tree.append_children(host_root, &[list]).unwrap();
    tree.append_children(list, &rows).unwrap();
    let positions = tree.live_fibers();

    for pass in 0..10 {
        tree.begin_pass();
        let current = tree.root(root).unwrap().current();

        let wip_root = tree.create_work_in_progress(current, Props::new()).unwrap();
        let current_list = tree.fiber(current).unwrap().child.unwrap();
        let wip_list = tree.create_work_in_progress(current_list, json!({}).into()).unwrap();
        tree.append_children(wip_root, &[wip_list]).unwrap();

        let current_rows = tree.children(current_list).unwrap();
        let mut wip_rows = Vec::new();
        for row in current_rows.into_iter().rev() {
            wip_rows.push(tree.create_work_in_progress(row, json!({ "pass": pass }).into()).unwrap());
        }
        tree.append_children(wip_list, &wip_rows).unwrap();

        for &id in wip_rows.iter().chain([&wip_list, &wip_root]) {
            let fiber = tree.fiber_mut(id).unwrap();
            fiber.flags |= Flags::UPDATE;
            fiber.memoize();
        }

        tree.set_finished_work(root, wip_root).unwrap();
        assert_eq!(tree.commit_root(root).unwrap(), wip_root);

        assert!(tree.live_fibers() <= positions * 2);
    }

    assert_eq!(tree.live_fibers(), positions * 2);
    assert_eq!(tree.render_pass(), 10);

    // Every live fiber with an alternate is linked both ways.
    let current = tree.root(root).unwrap().current();
    let mut stack = vec![current];
    while let Some(id) = stack.pop() {
        if let Some(alternate) = tree.alternate_of(id).unwrap() {
            assert_eq!(tree.alternate_of(alternate).unwrap(), Some(id));
        }
        stack.extend(tree.children(id).unwrap());
    }
    assert_eq!(tree.fiber(current).unwrap().state_node, StateNode::Root(root));
}

#[test]
fn test_abandoned_pass_restarts_clean() {
    let mut tree = FiberTree::new();
    let current = tree.create_fiber_from_element(&Element::host("p", json!({})));

    tree.begin_pass();
    let wip = tree.create_work_in_progress(current, json!({ "v": 1 }).into()).unwrap();
    tree.fiber_mut(wip).unwrap().flags = Flags::PLACEMENT;
    tree.fiber_mut(wip).unwrap().subtree_flags = Flags::UPDATE;

    // Abandon and restart.
    tree.begin_pass();
    let again = tree.create_work_in_progress(current, json!({ "v": 2 }).into()).unwrap();

    assert_eq!(again, wip);
    let fiber = tree.fiber(again).unwrap();
    assert!(fiber.flags.is_empty());
    assert!(fiber.subtree_flags.is_empty());
    assert_eq!(fiber.pending_props.get("v"), Some(&json!(2)));
    assert!(fiber.memoized_props.is_none());
    assert_eq!(fiber.derived_in_pass(), 2);
}

#[test]
fn test_unknown_element_logs_and_proceeds() {
    let element = Element::new(ElementType::Other(json!(42)), Props::new());

    let ((tag, fiber_type), logs) = with_captured_logs(|| {
        let mut tree = FiberTree::new();
        let id = tree.create_fiber_from_element(&element);
        let fiber = tree.fiber(id).unwrap();
        (fiber.tag, fiber.fiber_type.clone())
    });

    assert_eq!(tag, WorkTag::FunctionComponent);
    assert_eq!(fiber_type, spark_fiber::FiberType::Unknown(json!(42)));
    assert!(logs.contains("WARN"));
    assert!(logs.contains("unknown element type: 42"));
}

#[test]
fn test_unknown_element_diagnostics_off() {
    let element = Element::new(ElementType::Other(json!("?")), Props::new());

    let (tag, logs) = with_captured_logs(|| {
        let mut tree = FiberTree::with_config(TreeConfig {
            element_diagnostics: false,
            ..TreeConfig::default()
        });
        let id = tree.create_fiber_from_element(&element);
        tree.fiber(id).unwrap().tag
    });

    assert_eq!(tag, WorkTag::FunctionComponent);
    assert!(logs.is_empty());
}

#[test]
fn test_release_position_frees_both_generations() {
    let mut tree = FiberTree::new();
    let current = tree.create_fiber_from_element(&Element::host("div", json!({})));
    let text = tree.create_fiber(WorkTag::HostText, Props::new(), None);
    tree.append_children(current, &[text]).unwrap();
    tree.create_work_in_progress(current, Props::new()).unwrap();
    tree.create_work_in_progress(text, Props::new()).unwrap();

    assert_eq!(tree.live_fibers(), 4);
    let unrelated = tree.create_fiber(WorkTag::HostText, Props::new(), None);

    // Both divs, the text and its alternate.
    assert_eq!(tree.release(current).unwrap(), 4);
    assert_eq!(tree.live_fibers(), 1);
    assert!(tree.contains(unrelated));
}
