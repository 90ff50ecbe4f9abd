//! File-backed session tests: loading map and package files from disk.
#![expect(
    clippy::expect_used,
    reason = "tests fail fast when temporary files cannot be prepared"
)]

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use courier_core::test_support::{MapText, packages_text, two_node_map};
use courier_core::{ErrorKind, Package, ReportView, Session};
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> Utf8PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
    Workspace { _dir: dir, root }
}

fn load_both(session: &mut Session, map: &Utf8Path, packages: &Utf8Path) {
    session.load_map(map).expect("map file loads");
    session.load_packages(packages).expect("package file loads");
}

#[rstest]
fn evaluates_files_from_disk(workspace: Workspace) {
    let map = workspace.write("map.txt", two_node_map().render());
    let packages = workspace.write(
        "packages.txt",
        packages_text(&[
            Package::new("P1", 5.0, "B", 0, 3),
            Package::new("P2", 5.0, "B", 0, 20),
        ]),
    );

    let mut session = Session::default();
    load_both(&mut session, &map, &packages);
    let result = session.evaluate().expect("evaluation succeeds");

    // One group of weight 10 travelling distance 10.
    assert_eq!(result.total_cost, 1100.0);
    assert_eq!(result.late_packages, 1);
}

#[rstest]
fn map_report_counts_skipped_edges(workspace: Workspace) {
    let text = MapText::new(["A", "B", "C"])
        .edge(1, 2, 4.0)
        .edge(0, 2, 1.0)
        .edge(2, 7, 1.0)
        .render();
    let map = workspace.write("map.txt", text);

    let mut session = Session::default();
    let report = session.load_map(&map).expect("map file loads");
    assert_eq!(report.node_count, 3);
    assert_eq!(report.edge_count, 1);
    assert_eq!(report.declared_edges, 3);
    assert_eq!(report.skipped.len(), 2);
}

#[rstest]
fn missing_package_file_keeps_previous_packages(workspace: Workspace) {
    let map = workspace.write("map.txt", two_node_map().render());
    let packages = workspace.write("packages.txt", "P1 5 B 0 3\n");
    let mut session = Session::default();
    load_both(&mut session, &map, &packages);

    let err = session
        .load_packages(&workspace.path("gone.txt"))
        .expect_err("missing file");
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(session.packages().len(), 1);
}

#[rstest]
fn non_utf8_map_is_malformed_input(workspace: Workspace) {
    let good = workspace.write("map.txt", two_node_map().render());
    let bad = workspace.write("map.bin", [0xff_u8, 0xfe, 0x00]);
    let mut session = Session::default();
    session.load_map(&good).expect("map file loads");

    let err = session.load_map(&bad).expect_err("invalid UTF-8");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    assert_eq!(session.graph().node_count(), 2);
}

#[rstest]
fn non_utf8_package_file_still_loads(workspace: Workspace) {
    let map = workspace.write("map.txt", two_node_map().render());
    let packages = workspace.write("packages.txt", b"P1 5 B\xe9 0 3\nP2 5 B 0 20\n");
    let mut session = Session::default();
    session.load_map(&map).expect("map file loads");

    let report = session.load_packages(&packages).expect("package file loads");
    assert_eq!(report.package_count, 2);
    assert!(report.issue.is_none());
    let result = session.evaluate().expect("evaluation succeeds");
    assert_eq!(result.unreachable_packages, 1);
    assert_eq!(result.total_cost, 1050.0);
}

#[rstest]
fn info_report_lists_file_contents_in_order(workspace: Workspace) {
    let map = workspace.write(
        "map.txt",
        MapText::new(["Depot", "Mill", "Quay"]).edge(1, 3, 2.0).render(),
    );
    let packages = workspace.write("packages.txt", "Z9 3 Quay 1 4\nA1 2.5 Mill 0 9\n");
    let mut session = Session::default();
    load_both(&mut session, &map, &packages);

    let text = session.render(ReportView::Info).expect("info renders");
    let needles = ["  - Depot\n", "  - Mill\n", "  - Quay\n", "Package Z9:", "Package A1:"];
    for needle in needles {
        assert_eq!(text.matches(needle).count(), 1, "{needle:?} appears once");
    }
    let positions: Vec<usize> = needles
        .iter()
        .map(|needle| text.find(needle).expect("report mentions every item"))
        .collect();
    assert!(positions.windows(2).all(|pair| pair.first() < pair.last()));
    assert!(text.contains("Package Z9: weight 3, destination Quay, arrival 1, deadline 4"));
    assert!(text.contains("Package A1: weight 2.5, destination Mill, arrival 0, deadline 9"));
}
