use std::time::Duration;

use glam::Vec2;
use path_defence_core::{
    Mob, MobId, MobKind, TargetingStrategy, TileCoord, Tower, TowerId, TowerKind,
};
use path_defence_system_tower_targeting::{find_target, predict_mob_position};
use path_defence_world::grid::Grid;

const TILE: f32 = 32.0;

fn entrance_mob(kind: MobKind) -> (Mob, Vec<Vec2>) {
    let waypoints = Grid::create(20, 15).path_world_positions(TILE);
    let mob = Mob::spawn(MobId::new(1), kind, waypoints[0], Duration::ZERO);
    (mob, waypoints)
}

#[test]
fn prediction_follows_the_first_turn() {
    let (mob, waypoints) = entrance_mob(MobKind::Normal);

    let straight = predict_mob_position(&mob, 1.0, &waypoints);
    assert!(straight.distance(Vec2::new(96.0, 240.0)) < 1e-3, "{straight:?}");

    let turned = predict_mob_position(&mob, 3.0, &waypoints);
    assert!(turned.distance(Vec2::new(176.0, 160.0)) < 1e-3, "{turned:?}");
}

#[test]
fn prediction_clamps_at_the_exit() {
    let (mob, waypoints) = entrance_mob(MobKind::Fast);
    let exit = *waypoints.last().expect("path has waypoints");

    let far = predict_mob_position(&mob, 60.0, &waypoints);
    assert!(far.distance(exit) < 1e-3);
}

#[test]
fn first_strategy_prefers_mob_further_along_the_path() {
    let waypoints = Grid::create(20, 15).path_world_positions(TILE);
    let tower = Tower::build(TowerId::new(0), TileCoord::new(4, 6), TowerKind::Arrow);

    let mut behind = Mob::spawn(MobId::new(1), MobKind::Normal, waypoints[2], Duration::ZERO);
    behind.path_index = 2;
    let mut ahead = Mob::spawn(MobId::new(2), MobKind::Normal, waypoints[6], Duration::ZERO);
    ahead.path_index = 6;
    let mobs = vec![behind, ahead];

    let target = find_target(&tower, &mobs, TILE, TargetingStrategy::First);
    assert_eq!(target.map(|mob| mob.id), Some(MobId::new(2)));
}
