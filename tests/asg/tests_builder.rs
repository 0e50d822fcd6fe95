//! Structural invariants of the built ASG.

use cobol_asg::asg::{FileDescriptorKind, OccursClauseData, RedefinesClauseData};
use cobol_asg::{NodeData, NodeKind, Program, RefTarget};

use crate::helpers::build;

const FILE_PROGRAM: &str = "IDENTIFICATION DIVISION.\nPROGRAM-ID. FILES.\nENVIRONMENT DIVISION.\nINPUT-OUTPUT SECTION.\nFILE-CONTROL.\n    SELECT IN-FILE ASSIGN TO 'IN.DAT'\n        ORGANIZATION IS LINE SEQUENTIAL\n        FILE STATUS IS WS-STATUS.\nDATA DIVISION.\nFILE SECTION.\nFD IN-FILE\n    LABEL RECORDS ARE STANDARD\n    RECORD CONTAINS 80 CHARACTERS.\n01 IN-REC PIC X(80).\nWORKING-STORAGE SECTION.\n01 WS-STATUS PIC XX.\nPROCEDURE DIVISION.\n    OPEN INPUT IN-FILE.\n    READ IN-FILE AT END CONTINUE END-READ.\n    CLOSE IN-FILE.";

fn every_node(program: &Program) -> Vec<cobol_asg::NodeId> {
    program.descendants(program.root())
}

#[test]
fn registry_is_a_bijection() {
    let program = build(FILE_PROGRAM);

    // Every node's context resolves back to that node.
    for id in every_node(&program) {
        let node = program.node(id);
        assert_eq!(
            program.registry().lookup(&node.ctx()),
            Some(id),
            "node {id:?} lost its context"
        );
    }

    // Every registered context maps to a node claiming it.
    for (ctx, id) in program.registry().iter() {
        assert_eq!(&program.node(id).ctx(), ctx);
    }
    assert_eq!(program.registry().len(), program.node_count());
}

#[test]
fn parent_links_reach_the_root_without_cycles() {
    let program = build(FILE_PROGRAM);
    let budget = program.node_count();
    for id in every_node(&program) {
        let mut current = id;
        let mut steps = 0;
        while let Some(parent) = program.node(current).parent() {
            current = parent;
            steps += 1;
            assert!(steps <= budget, "cycle reached from {id:?}");
        }
        assert_eq!(current, program.root());
    }
}

#[test]
fn creation_order_follows_pass_order() {
    let program = build(FILE_PROGRAM);
    // The arena is append-only, so ids grow with pass order: skeleton
    // before data entries before statements.
    let first_id_of = |kind: NodeKind| {
        program
            .nodes()
            .find(|node| node.kind() == kind)
            .map(|node| node.id())
    };
    let division = first_id_of(NodeKind::DataDivision).unwrap();
    let entry = first_id_of(NodeKind::DataDescriptionEntry).unwrap();
    let statement = first_id_of(NodeKind::Statement).unwrap();
    assert!(division < entry);
    assert!(entry < statement);
}

#[test]
fn fd_and_select_are_cross_linked() {
    let program = build(FILE_PROGRAM);
    let unit = program.units()[0];

    let select = program
        .descendants(unit)
        .into_iter()
        .find(|&id| program.node(id).kind() == NodeKind::FileControlEntry)
        .expect("select entry");
    let descriptor = program
        .descendants(unit)
        .into_iter()
        .find(|&id| program.node(id).kind() == NodeKind::FileDescriptionEntry)
        .expect("fd entry");

    match program.node(select).data() {
        NodeData::FileControlEntry(data) => {
            assert_eq!(data.name, "IN-FILE");
            assert_eq!(data.file_description, Some(descriptor));
        }
        other => panic!("unexpected: {other:?}"),
    }
    match program.node(descriptor).data() {
        NodeData::FileDescriptionEntry(data) => {
            assert_eq!(data.kind, FileDescriptorKind::Fd);
            assert_eq!(data.file_control, Some(select));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn select_clauses_attach_to_their_entry() {
    let program = build(FILE_PROGRAM);
    let unit = program.units()[0];
    let select = program
        .descendants(unit)
        .into_iter()
        .find(|&id| program.node(id).kind() == NodeKind::FileControlEntry)
        .unwrap();

    assert!(program.child_of_kind(select, NodeKind::AssignClause).is_some());
    let organization = program
        .child_of_kind(select, NodeKind::OrganizationClause)
        .expect("organization clause");
    match program.node(organization).data() {
        NodeData::OrganizationClause(data) => {
            assert_eq!(data.organization, "LINE SEQUENTIAL");
        }
        other => panic!("unexpected: {other:?}"),
    }
    let status = program
        .child_of_kind(select, NodeKind::FileStatusClause)
        .expect("file status clause");
    match program.node(status).data() {
        NodeData::FileStatusClause(data) => {
            assert!(data.name.target.is_resolved(), "{:?}", data.name);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn level_numbers_drive_the_hierarchy() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. LEVELS.\nDATA DIVISION.\nWORKING-STORAGE SECTION.\n01 REC.\n   05 HEAD.\n      10 H-A PIC X.\n      10 H-B PIC X.\n   05 TAIL PIC X.\n      88 TAIL-SET VALUE 'Y'.\n77 LONELY PIC 9.",
    );
    let unit = program.units()[0];
    let entry = |name: &str| {
        program
            .descendants(unit)
            .into_iter()
            .find(|&id| {
                program
                    .node(id)
                    .name()
                    .is_some_and(|entry_name| entry_name == name)
            })
            .unwrap_or_else(|| panic!("entry {name} missing"))
    };

    let rec = entry("REC");
    let head = entry("HEAD");
    let h_b = entry("H-B");
    let tail = entry("TAIL");
    let tail_set = entry("TAIL-SET");
    let lonely = entry("LONELY");

    assert_eq!(program.node(head).parent(), Some(rec));
    assert_eq!(program.node(h_b).parent(), Some(head));
    assert_eq!(program.node(tail).parent(), Some(rec));
    // 88s hang off the entry they condition.
    assert_eq!(program.node(tail_set).parent(), Some(tail));
    match program.node(tail_set).data() {
        NodeData::DataDescriptionEntry(data) => {
            assert_eq!(data.condition_subject, Some(tail));
        }
        other => panic!("unexpected: {other:?}"),
    }
    // 77s restart at section level.
    assert_eq!(
        program.node(lonely).parent(),
        program
            .descendants(unit)
            .into_iter()
            .find(|&id| program.node(id).kind() == NodeKind::WorkingStorageSection)
    );
}

#[test]
fn redefines_and_occurs_depending_on_resolve() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. LINKS.\nDATA DIVISION.\nWORKING-STORAGE SECTION.\n01 BUF PIC X(100).\n01 MAP-BUF REDEFINES BUF.\n   05 CELL PIC X OCCURS 1 TO 100 TIMES DEPENDING ON FILL-LEN.\n01 FILL-LEN PIC 9(3).",
    );
    let unit = program.units()[0];

    let redefines = program
        .descendants(unit)
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::RedefinesClause(RedefinesClauseData { target }) => Some(target.clone()),
            _ => None,
        })
        .expect("redefines clause");
    assert!(redefines.target.is_resolved(), "{redefines:?}");

    let occurs = program
        .descendants(unit)
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::OccursClause(OccursClauseData {
                min,
                max,
                depending_on: Some(depending),
                ..
            }) => Some((*min, *max, depending.clone())),
            _ => None,
        })
        .expect("occurs clause");
    assert_eq!(occurs.0, 1);
    assert_eq!(occurs.1, Some(100));
    assert!(matches!(occurs.2.target, RefTarget::Resolved(_)));
}

#[test]
fn picture_and_value_clauses_are_captured() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. PICS.\nDATA DIVISION.\nWORKING-STORAGE SECTION.\n01 AMT PIC S9(4)V99 VALUE ZERO COMP-3.",
    );
    let unit = program.units()[0];
    let picture = program
        .descendants(unit)
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::PictureClause(data) => Some(data.picture.clone()),
            _ => None,
        })
        .expect("picture clause");
    assert_eq!(picture, "S9(4)V99");

    let usage = program
        .descendants(unit)
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::UsageClause(data) => Some(data.usage.clone()),
            _ => None,
        })
        .expect("usage clause");
    assert_eq!(usage, "COMP-3");

    let values = program
        .descendants(unit)
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::ValueClause(data) => Some(data.values.clone()),
            _ => None,
        })
        .expect("value clause");
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].from, "ZERO");
}

#[test]
fn renames_and_condition_value_ranges() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. RENAME.\nDATA DIVISION.\nWORKING-STORAGE SECTION.\n01 PERSON.\n   05 FIRST-NAME PIC X(10).\n   05 LAST-NAME PIC X(10).\n   05 GRADE PIC X.\n      88 PASSING VALUE 'A' THRU 'M'.\n66 WHOLE-NAME RENAMES FIRST-NAME THRU LAST-NAME.",
    );
    let unit = program.units()[0];

    let renames = program
        .descendants(unit)
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::RenamesClause(data) => Some(data.clone()),
            _ => None,
        })
        .expect("renames clause");
    assert!(renames.from.target.is_resolved(), "{:?}", renames.from);
    assert!(renames.thru.as_ref().is_some_and(|thru| thru.target.is_resolved()));

    // The 66 entry hangs under the record it renames within.
    let whole_name = program
        .descendants(unit)
        .into_iter()
        .find(|&id| program.node(id).name().is_some_and(|name| name == "WHOLE-NAME"))
        .expect("level-66 entry");
    let person = program
        .descendants(unit)
        .into_iter()
        .find(|&id| program.node(id).name().is_some_and(|name| name == "PERSON"))
        .expect("record");
    assert_eq!(program.node(whole_name).parent(), Some(person));

    let values = program
        .descendants(unit)
        .into_iter()
        .find_map(|id| match program.node(id).data() {
            NodeData::ValueClause(data) => Some(data.values.clone()),
            _ => None,
        })
        .expect("condition value clause");
    assert_eq!(values[0].from, "'A'");
    assert_eq!(values[0].thru.as_deref(), Some("'M'"));
}

#[test]
fn registry_is_frozen_after_the_build() {
    let program = build(
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. FROZEN.\nPROCEDURE DIVISION.\n    CONTINUE.",
    );
    assert!(program.registry().is_frozen());
}
