//! Board passive effects, applied once per register after all cards.
//!
//! Fixed order: express conveyors (twice), ordinary conveyors (once),
//! gears, lasers, then checkpoints together with repair and battery tiles.

use smallvec::SmallVec;

use super::movement::Field;
use crate::board::{Position, Tile};
use crate::events::{AnimationKind, LaserSource};

/// Apply every passive effect in order.
pub fn run_board_effects(field: &mut Field<'_>) {
    run_conveyors(field, true);
    run_conveyors(field, true);
    run_conveyors(field, false);
    run_gears(field);
    fire_lasers(field);
    resolve_tiles(field);
}

#[derive(Clone, Copy, Debug)]
struct BeltMove {
    idx: usize,
    from: Position,
    to: Position,
    cancelled: bool,
}

/// One conveyor activation for either express or ordinary belts.
///
/// All qualifying robots move simultaneously. Belts never push: a robot
/// whose destination is held by a robot that is not itself moving away,
/// or contested by another carried robot, stays put.
pub fn run_conveyors(field: &mut Field<'_>, express: bool) {
    let mut moves: SmallVec<[BeltMove; 8]> = SmallVec::new();

    for (idx, robot) in field.robots.iter().enumerate() {
        if !robot.is_on_board() {
            continue;
        }
        if let Some(Tile::Conveyor { direction, express: is_express, .. }) = field.board.tile_at(robot.position) {
            if is_express != express || field.board.is_wall_blocking(robot.position, direction) {
                continue;
            }
            moves.push(BeltMove {
                idx,
                from: robot.position,
                to: robot.position.step(direction),
                cancelled: false,
            });
        }
    }

    if moves.is_empty() {
        return;
    }

    // Cancelling one move can block another, so iterate to a fixed point.
    loop {
        let mut changed = false;
        for i in 0..moves.len() {
            if moves[i].cancelled {
                continue;
            }
            let target = moves[i].to;
            let contested = moves
                .iter()
                .enumerate()
                .any(|(j, m)| j != i && !m.cancelled && m.to == target);
            let blocked = match field.occupant(target) {
                None => false,
                Some(other) => match moves.iter().find(|m| m.idx == other) {
                    // A stationary robot blocks; so does a head-on swap.
                    None => true,
                    Some(m) => m.cancelled || m.to == moves[i].from,
                },
            };
            if contested || blocked {
                moves[i].cancelled = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    for m in moves.iter().filter(|m| !m.cancelled) {
        field.robots[m.idx].position = m.to;
        field.log.push(AnimationKind::ConveyorMove {
            player: field.owners[m.idx],
            from: m.from,
            to: m.to,
        });
    }

    for m in moves.iter().filter(|m| !m.cancelled) {
        field.check_hazard(m.idx);
        if !field.robots[m.idx].is_on_board() {
            continue;
        }
        if let Some(Tile::Conveyor { turn: Some(rotation), .. }) = field.board.tile_at(m.to) {
            field.rotate(m.idx, rotation);
        }
    }
}

/// Rotate every robot standing on a gear.
pub fn run_gears(field: &mut Field<'_>) {
    for idx in 0..field.robots.len() {
        if !field.robots[idx].is_on_board() {
            continue;
        }
        if let Some(Tile::Gear { rotation }) = field.board.tile_at(field.robots[idx].position) {
            let player = field.owners[idx];
            field.log.push(AnimationKind::GearRotate { player, rotation });
            field.rotate(idx, rotation);
        }
    }
}

/// Fire board lasers and robot lasers, then apply all damage at once.
pub fn fire_lasers(field: &mut Field<'_>) {
    let mut hits: SmallVec<[(usize, u8); 8]> = SmallVec::new();

    for laser in &field.board.lasers {
        let trace = field
            .board
            .trace_beam(laser.origin, laser.direction, |p| field.occupant(p).is_some());
        let hit = trace.hit.and_then(|p| field.occupant(p));
        if let Some(&to) = trace.path.last() {
            field.log.push(AnimationKind::LaserFire {
                source: LaserSource::Board,
                from: laser.origin,
                to,
                direction: laser.direction,
                hit: hit.map(|i| field.owners[i]),
            });
        }
        if let Some(target) = hit {
            hits.push((target, laser.strength));
        }
    }

    for idx in 0..field.robots.len() {
        let robot = &field.robots[idx];
        if !robot.is_on_board() {
            continue;
        }
        let (pos, direction) = (robot.position, robot.direction);
        if field.board.is_wall_blocking(pos, direction) {
            continue;
        }
        let start = pos.step(direction);
        let trace = field
            .board
            .trace_beam(start, direction, |p| field.occupant(p).is_some());
        let hit = trace.hit.and_then(|p| field.occupant(p));
        if let Some(&to) = trace.path.last() {
            field.log.push(AnimationKind::LaserFire {
                source: LaserSource::Robot { player: field.owners[idx] },
                from: pos,
                to,
                direction,
                hit: hit.map(|i| field.owners[i]),
            });
        }
        if let Some(target) = hit {
            hits.push((target, 1));
        }
    }

    for (target, amount) in hits {
        field.damage(target, amount);
    }
}

/// Checkpoints, repair tiles and batteries.
pub fn resolve_tiles(field: &mut Field<'_>) {
    for idx in 0..field.robots.len() {
        if !field.robots[idx].is_on_board() {
            continue;
        }
        let pos = field.robots[idx].position;
        let player = field.owners[idx];

        if let Some(checkpoint) = field.board.checkpoint_at(pos) {
            if field.robots[idx].capture_checkpoint(checkpoint.order, pos) {
                field.log.push(AnimationKind::CheckpointReached {
                    player,
                    order: checkpoint.order,
                });
            }
        }

        match field.board.tile_at(pos) {
            Some(Tile::Repair) if field.robots[idx].damage > 0 => {
                let robot = &mut field.robots[idx];
                robot.damage -= 1;
                let damage = robot.damage;
                field.log.push(AnimationKind::Repair { player, damage });
            }
            Some(Tile::Battery) => {
                let robot = &mut field.robots[idx];
                robot.energy = robot.energy.saturating_add(1);
                let energy = robot.energy;
                field.log.push(AnimationKind::EnergyGained { player, energy });
            }
            _ => {}
        }
    }
}
