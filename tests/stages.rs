use lifekernel::storage::demo_campaign;
use lifekernel::{
    CellCategory, ClusterSpec, DriverState, EngineConfig, GridPos, RuleVariant, StageDescriptor,
    StageError, TickDriver, Vec2, WallPrimitive,
};
use std::time::Duration;

fn stage(name: &str, rule: RuleVariant) -> StageDescriptor {
    StageDescriptor {
        name: name.to_string(),
        rule,
        player_start: GridPos::new(1, 1),
        goal: GridPos::new(18, 18),
        clusters: vec![ClusterSpec {
            core: GridPos::new(10, 10),
            halo_radius: 3,
            halo_count: 8,
        }],
        walls: vec![WallPrimitive::Platform {
            origin: GridPos::new(0, 0),
            length: 20,
        }],
        patterns: Vec::new(),
    }
}

fn driver() -> TickDriver {
    let mut d = TickDriver::new(EngineConfig {
        width: 20,
        height: 20,
        cell_size: 0.5,
        ..EngineConfig::default()
    })
    .unwrap();
    d.set_stages(vec![
        stage("one", RuleVariant::ConwayLife),
        stage("two", RuleVariant::Maze),
    ]);
    d
}

#[test]
fn loading_builds_walls_cluster_and_goal() {
    let mut d = driver();
    let report = d.select_stage(1).unwrap().clone();
    assert_eq!(report.walls, 20);
    assert_eq!(report.halos.len(), 1);
    assert_eq!(report.rule, RuleVariant::Maze);
    assert_eq!(report.goal, GridPos::new(18, 18));
    assert_eq!(report.goal_world, Vec2::new(4.25, 4.25));

    assert_eq!(d.state(), DriverState::Running);
    assert_eq!(d.stage_index(), Some(1));
    assert_eq!(d.variant(), Some(RuleVariant::Maze));
    let grid = d.grid().unwrap();
    assert_eq!(grid.count_category(CellCategory::Wall), 20);
    assert_eq!(grid.count_category(CellCategory::Core), 1);
    assert_eq!(
        grid.count_category(CellCategory::Ordinary) as u32,
        report.halos[0]
    );
}

#[test]
fn walls_crossing_the_edge_are_clipped() {
    let mut d = driver();
    let mut edge = stage("edge", RuleVariant::ConwayLife);
    edge.walls.extend([
        WallPrimitive::Platform {
            origin: GridPos::new(15, 3),
            length: 10,
        },
        WallPrimitive::Rect {
            origin: GridPos::new(17, 17),
            width: 6,
            height: 6,
        },
        WallPrimitive::Stair {
            origin: GridPos::new(-2, 5),
            steps: 4,
            run: 3,
            descending: false,
        },
        WallPrimitive::Platform {
            origin: GridPos::new(i32::MAX - 1, 0),
            length: 5,
        },
        WallPrimitive::Platform {
            origin: GridPos::new(0, 12),
            length: u32::MAX,
        },
        WallPrimitive::Cell {
            at: GridPos::new(-1, 19),
        },
    ]);

    // 20 floor + 5 platform + 5 box + 10 stair + 0 + 20 long platform.
    let report = d.load(edge).unwrap().clone();
    assert_eq!(report.walls, 60);
    let grid = d.grid().unwrap();
    assert_eq!(grid.count_category(CellCategory::Wall), 60);
    for (x, y) in [(19, 3), (17, 19), (19, 17), (0, 5), (9, 8), (19, 12)] {
        assert_eq!(grid.get(x, y).unwrap().category(), CellCategory::Wall, "({x},{y})");
    }
    assert!(!grid.is_alive(18, 18));
    assert!(!grid.is_alive(14, 3));
}

#[test]
fn reloading_resets_previous_stage() {
    let mut d = driver();
    d.select_stage(0).unwrap();
    for _ in 0..5 {
        d.step();
    }
    d.place_cell(5, 5);
    d.select_stage(1).unwrap();
    let grid = d.grid().unwrap();
    assert_eq!(grid.count_category(CellCategory::PlayerPlaced), 0);
    assert_eq!(grid.count_category(CellCategory::Core), 1);
    assert_eq!(d.tick_count(), 0);
}

#[test]
fn bad_stage_index_keeps_active_stage() {
    let mut d = driver();
    assert_eq!(
        d.select_stage(0).map(|r| r.rule),
        Ok(RuleVariant::ConwayLife)
    );
    d.step();
    let before: Vec<bool> = d.grid().unwrap().cells().map(|c| c.alive()).collect();

    assert_eq!(
        d.select_stage(7).unwrap_err(),
        StageError::UnknownStage { index: 7, count: 2 }
    );
    assert_eq!(d.stage_index(), Some(0));
    assert_eq!(d.tick_count(), 1);
    let after: Vec<bool> = d.grid().unwrap().cells().map(|c| c.alive()).collect();
    assert_eq!(before, after);
}

#[test]
fn malformed_descriptor_is_dropped() {
    let mut d = driver();
    d.select_stage(0).unwrap();

    let mut bad = stage("bad", RuleVariant::Seeds);
    bad.clusters[0].halo_radius = 0;
    assert!(matches!(
        d.load(bad),
        Err(StageError::InvalidCluster { index: 0, .. })
    ));

    let mut off_grid = stage("off", RuleVariant::Seeds);
    off_grid.goal = GridPos::new(20, 3);
    assert!(matches!(
        d.load(off_grid),
        Err(StageError::OutOfBounds { what: "goal", .. })
    ));

    assert_eq!(d.stage().map(|s| s.name.as_str()), Some("one"));
    assert_eq!(d.variant(), Some(RuleVariant::ConwayLife));
}

#[test]
fn stage_cycling_wraps() {
    let mut d = driver();
    d.next_stage().unwrap();
    assert_eq!(d.stage_index(), Some(0));
    d.next_stage().unwrap();
    assert_eq!(d.stage_index(), Some(1));
    d.next_stage().unwrap();
    assert_eq!(d.stage_index(), Some(0));
    d.prev_stage().unwrap();
    assert_eq!(d.stage_index(), Some(1));
}

#[test]
fn cluster_core_survives_ticks_and_falls_to_strike() {
    let mut d = driver();
    d.select_stage(0).unwrap();
    for _ in 0..3 {
        assert!(d.advance(Duration::from_secs(2)).is_some());
    }
    assert_eq!(d.grid().unwrap().get(10, 10).unwrap().category(), CellCategory::Core);
    assert!(d.grid().unwrap().is_alive(10, 10));

    let at = d.grid().unwrap().grid_to_world(10, 10);
    assert!(matches!(
        d.strike(at),
        lifekernel::StrikeOutcome::Core { at: GridPos { x: 10, y: 10 }, .. }
    ));
    assert_eq!(d.grid().unwrap().count_category(CellCategory::Core), 0);
    assert_eq!(d.grid().unwrap().count_category(CellCategory::Wall), 20);
}

#[test]
fn demo_campaign_plays() {
    let campaign = demo_campaign().unwrap();
    let mut d = TickDriver::new(EngineConfig::default()).unwrap();
    let count = campaign.stages.len();
    d.set_stages(campaign.stages);
    for i in 0..count {
        let report = d.select_stage(i).unwrap();
        assert!(report.walls > 0);
        for _ in 0..10 {
            d.step();
        }
        assert!(d.grid().unwrap().count_category(CellCategory::Core) > 0);
    }
}
