use std::collections::BTreeMap;

use tilepush_core::{CellCoord, Command, EngineError, Event, LegendEntry, SpriteId, SpriteType};
use tilepush_world::{self as world, query, World};

const PLAYER: SpriteType = SpriteType::new('p');
const BOX: SpriteType = SpriteType::new('b');
const WALL: SpriteType = SpriteType::new('w');
const GOAL: SpriteType = SpriteType::new('g');

fn legend(order: &[SpriteType]) -> Command {
    Command::SetLegend {
        entries: order
            .iter()
            .map(|tag| LegendEntry::new(*tag, String::new()))
            .collect(),
    }
}

fn setup_with_legend(order: &[SpriteType], map: &str) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    let mut pushables = BTreeMap::new();
    let _ = pushables.insert(PLAYER, vec![BOX]);
    let _ = pushables.insert(BOX, vec![BOX]);

    for command in [
        legend(order),
        Command::LoadMap {
            text: map.to_owned(),
        },
        Command::SetSolids {
            solids: vec![PLAYER, BOX, WALL],
        },
        Command::SetPushables { pushables },
    ] {
        world::apply(&mut world, command, &mut events).expect("setup command succeeds");
    }
    world
}

fn setup(map: &str) -> World {
    setup_with_legend(&[PLAYER, BOX, WALL, GOAL], map)
}

fn add(world: &mut World, x: i32, y: i32, kind: SpriteType) -> SpriteId {
    let mut events = Vec::new();
    world::apply(world, Command::AddSprite { x, y, kind }, &mut events).expect("sprite added");
    match events.as_slice() {
        [Event::SpriteAdded { sprite, .. }] => *sprite,
        other => panic!("unexpected events {other:?}"),
    }
}

fn first(world: &World, kind: SpriteType) -> SpriteId {
    query::first(world, kind).expect("sprite of type present").id
}

fn cell_of(world: &World, sprite: SpriteId) -> CellCoord {
    query::sprite(world, sprite).expect("sprite alive").cell
}

fn move_sprite(world: &mut World, sprite: SpriteId, dx: i32, dy: i32) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::MoveSprite { sprite, dx, dy }, &mut events)
        .expect("move request accepted");
    events
}

fn moved(sprite: SpriteId, from: (u32, u32), to: (u32, u32)) -> Event {
    Event::SpriteMoved {
        sprite,
        from: CellCoord::new(from.0, from.1),
        to: CellCoord::new(to.0, to.1),
    }
}

#[test]
fn solid_moves_into_empty_cell() {
    let mut world = setup("p.\n..");
    let player = first(&world, PLAYER);

    let events = move_sprite(&mut world, player, 1, 0);

    assert_eq!(events, vec![moved(player, (0, 0), (1, 0))]);
    let snapshot = query::sprite(&world, player).expect("player alive");
    assert_eq!(snapshot.cell, CellCoord::new(1, 0));
    assert_eq!((snapshot.pending_dx, snapshot.pending_dy), (1, 0));
}

#[test]
fn leaving_the_grid_is_rejected() {
    let mut world = setup("p.");
    let player = first(&world, PLAYER);

    for (dx, dy) in [(-1, 0), (0, -1), (0, 1), (2, 0)] {
        let events = move_sprite(&mut world, player, dx, dy);
        assert_eq!(events, vec![Event::MoveRejected { sprite: player, dx, dy }]);
        assert_eq!(cell_of(&world, player), CellCoord::new(0, 0));
    }
}

#[test]
fn non_pushable_solid_blocks_and_nothing_moves() {
    let mut world = setup("pw");
    let player = first(&world, PLAYER);
    let wall = first(&world, WALL);

    let events = move_sprite(&mut world, player, 1, 0);

    assert_eq!(
        events,
        vec![Event::MoveRejected {
            sprite: player,
            dx: 1,
            dy: 0,
        }]
    );
    assert_eq!(cell_of(&world, player), CellCoord::new(0, 0));
    assert_eq!(cell_of(&world, wall), CellCoord::new(1, 0));
    let snapshot = query::sprite(&world, player).expect("player alive");
    assert_eq!((snapshot.pending_dx, snapshot.pending_dy), (0, 0));
}

#[test]
fn non_solid_mover_passes_through_solids() {
    let mut world = setup("gw");
    let goal = first(&world, GOAL);

    let events = move_sprite(&mut world, goal, 1, 0);

    assert_eq!(events, vec![moved(goal, (0, 0), (1, 0))]);
    let stacked: Vec<_> = query::tile(&world, 1, 0).iter().map(|s| s.kind).collect();
    assert_eq!(stacked, vec![WALL, GOAL]);
}

#[test]
fn solid_mover_shares_cell_with_non_solid() {
    let mut world = setup("pg");
    let player = first(&world, PLAYER);

    let _ = move_sprite(&mut world, player, 1, 0);

    assert_eq!(cell_of(&world, player), CellCoord::new(1, 0));
    assert_eq!(cell_of(&world, first(&world, GOAL)), CellCoord::new(1, 0));
}

#[test]
fn pushable_permission_on_non_solid_has_no_effect() {
    let mut world = setup("pg.");
    let mut pushables = BTreeMap::new();
    let _ = pushables.insert(PLAYER, vec![GOAL]);
    world::apply(&mut world, Command::SetPushables { pushables }, &mut Vec::new())
        .expect("pushables replaced");
    let player = first(&world, PLAYER);

    let events = move_sprite(&mut world, player, 1, 0);

    assert_eq!(events, vec![moved(player, (0, 0), (1, 0))]);
    assert_eq!(cell_of(&world, first(&world, GOAL)), CellCoord::new(1, 0));
}

#[test]
fn single_push_shifts_both_sprites() {
    let mut world = setup("pb.");
    let player = first(&world, PLAYER);
    let crate_id = first(&world, BOX);

    let events = move_sprite(&mut world, player, 1, 0);

    assert_eq!(
        events,
        vec![
            moved(crate_id, (1, 0), (2, 0)),
            moved(player, (0, 0), (1, 0)),
        ]
    );
}

#[test]
fn vertical_chain_push_shifts_every_link() {
    let mut world = setup("p\nb\nb\n.");
    let player = first(&world, PLAYER);
    let boxes: Vec<_> = query::all(&world, Some(BOX)).iter().map(|s| s.id).collect();

    let events = move_sprite(&mut world, player, 0, 1);

    assert_eq!(
        events,
        vec![
            moved(boxes[1], (0, 2), (0, 3)),
            moved(boxes[0], (0, 1), (0, 2)),
            moved(player, (0, 0), (0, 1)),
        ]
    );
}

#[test]
fn chain_ending_in_a_wall_moves_nothing() {
    let mut world = setup("pbbw");
    let player = first(&world, PLAYER);
    let before = query::all(&world, None);

    let events = move_sprite(&mut world, player, 1, 0);

    assert_eq!(
        events,
        vec![Event::MoveRejected {
            sprite: player,
            dx: 1,
            dy: 0,
        }]
    );
    assert_eq!(query::all(&world, None), before);
}

#[test]
fn chain_ending_at_the_edge_moves_nothing() {
    let mut world = setup("pbb");
    let player = first(&world, PLAYER);
    let before = query::all(&world, None);

    let _ = move_sprite(&mut world, player, 1, 0);

    assert_eq!(query::all(&world, None), before);
}

#[test]
fn pushed_sprite_stays_moved_when_a_cellmate_blocks() {
    let mut world = setup("pb.");
    let player = first(&world, PLAYER);
    let crate_id = first(&world, BOX);
    let wall = add(&mut world, 1, 0, WALL);

    let events = move_sprite(&mut world, player, 1, 0);

    assert_eq!(
        events,
        vec![
            moved(crate_id, (1, 0), (2, 0)),
            Event::MoveRejected {
                sprite: player,
                dx: 1,
                dy: 0,
            },
        ]
    );
    assert_eq!(cell_of(&world, player), CellCoord::new(0, 0));
    assert_eq!(cell_of(&world, crate_id), CellCoord::new(2, 0));
    assert_eq!(cell_of(&world, wall), CellCoord::new(1, 0));
}

#[test]
fn blocker_stacked_above_pushable_prevents_the_push() {
    let mut world = setup_with_legend(&[PLAYER, WALL, BOX, GOAL], "pb.");
    let player = first(&world, PLAYER);
    let crate_id = first(&world, BOX);
    let _ = add(&mut world, 1, 0, WALL);

    let events = move_sprite(&mut world, player, 1, 0);

    assert_eq!(
        events,
        vec![Event::MoveRejected {
            sprite: player,
            dx: 1,
            dy: 0,
        }]
    );
    assert_eq!(cell_of(&world, crate_id), CellCoord::new(1, 0));
}

#[test]
fn deep_chain_leaks_only_the_committed_tail() {
    let mut world = setup("pbbb.");
    let player = first(&world, PLAYER);
    let boxes: Vec<_> = query::all(&world, Some(BOX)).iter().map(|s| s.id).collect();
    let _ = add(&mut world, 3, 0, WALL);

    let events = move_sprite(&mut world, player, 1, 0);

    assert_eq!(
        events,
        vec![
            moved(boxes[2], (3, 0), (4, 0)),
            Event::MoveRejected {
                sprite: player,
                dx: 1,
                dy: 0,
            },
        ]
    );
    assert_eq!(cell_of(&world, player), CellCoord::new(0, 0));
    assert_eq!(cell_of(&world, boxes[0]), CellCoord::new(1, 0));
    assert_eq!(cell_of(&world, boxes[1]), CellCoord::new(2, 0));
    assert_eq!(cell_of(&world, boxes[2]), CellCoord::new(4, 0));
}

#[test]
fn stacked_boxes_see_the_freshly_pushed_neighbour() {
    let mut world = setup("pb..");
    let player = first(&world, PLAYER);
    let lower = first(&world, BOX);
    let upper = add(&mut world, 1, 0, BOX);

    let events = move_sprite(&mut world, player, 1, 0);

    assert_eq!(
        events,
        vec![
            moved(lower, (1, 0), (2, 0)),
            moved(lower, (2, 0), (3, 0)),
            moved(upper, (1, 0), (2, 0)),
            moved(player, (0, 0), (1, 0)),
        ]
    );
}

#[test]
fn stacked_boxes_leak_when_the_second_push_hits_the_edge() {
    let mut world = setup("pb.");
    let player = first(&world, PLAYER);
    let lower = first(&world, BOX);
    let upper = add(&mut world, 1, 0, BOX);

    let events = move_sprite(&mut world, player, 1, 0);

    assert_eq!(
        events,
        vec![
            moved(lower, (1, 0), (2, 0)),
            Event::MoveRejected {
                sprite: player,
                dx: 1,
                dy: 0,
            },
        ]
    );
    assert_eq!(cell_of(&world, upper), CellCoord::new(1, 0));
    assert_eq!(cell_of(&world, player), CellCoord::new(0, 0));
}

#[test]
fn zero_delta_always_succeeds_silently() {
    let mut world = setup("pw");
    let player = first(&world, PLAYER);

    let events = move_sprite(&mut world, player, 0, 0);

    assert!(events.is_empty());
    assert_eq!(cell_of(&world, player), CellCoord::new(0, 0));
}

#[test]
fn push_limit_bounds_chain_length() {
    let mut world = setup("pbb.");
    let player = first(&world, PLAYER);
    let before = query::all(&world, None);

    world::apply(
        &mut world,
        Command::ConfigurePushLimit { max_depth: 1 },
        &mut Vec::new(),
    )
    .expect("limit configured");
    let _ = move_sprite(&mut world, player, 1, 0);
    assert_eq!(query::all(&world, None), before);

    world::apply(
        &mut world,
        Command::ConfigurePushLimit { max_depth: 2 },
        &mut Vec::new(),
    )
    .expect("limit configured");
    let _ = move_sprite(&mut world, player, 1, 0);
    assert_eq!(cell_of(&world, player), CellCoord::new(1, 0));
}

#[test]
fn long_chains_resolve_within_the_default_limit() {
    let row = format!("p{}.", "b".repeat(200));
    let mut world = setup(&row);
    let player = first(&world, PLAYER);

    let events = move_sprite(&mut world, player, 1, 0);

    assert_eq!(events.len(), 201);
    assert_eq!(cell_of(&world, player), CellCoord::new(1, 0));
}

#[test]
fn solids_reconfiguration_applies_to_the_next_move() {
    let mut world = setup("pw");
    let player = first(&world, PLAYER);
    assert_eq!(move_sprite(&mut world, player, 1, 0).len(), 1);
    assert_eq!(cell_of(&world, player), CellCoord::new(0, 0));

    world::apply(
        &mut world,
        Command::SetSolids {
            solids: vec![PLAYER],
        },
        &mut Vec::new(),
    )
    .expect("solids replaced");
    let _ = move_sprite(&mut world, player, 1, 0);
    assert_eq!(cell_of(&world, player), CellCoord::new(1, 0));
}

#[test]
fn axis_setters_record_only_their_component() {
    let mut world = setup("p..\n...");
    let player = first(&world, PLAYER);
    let mut events = Vec::new();

    world::apply(&mut world, Command::SetSpriteX { sprite: player, x: 2 }, &mut events)
        .expect("x set");
    world::apply(&mut world, Command::SetSpriteY { sprite: player, y: 1 }, &mut events)
        .expect("y set");

    let snapshot = query::sprite(&world, player).expect("player alive");
    assert_eq!(snapshot.cell, CellCoord::new(2, 1));
    assert_eq!((snapshot.pending_dx, snapshot.pending_dy), (2, 1));

    world::apply(&mut world, Command::SetSpriteX { sprite: player, x: 5 }, &mut events)
        .expect("x request accepted");
    let snapshot = query::sprite(&world, player).expect("player alive");
    assert_eq!(snapshot.cell, CellCoord::new(2, 1));
    assert_eq!(snapshot.pending_dx, 2);

    world::apply(&mut world, Command::ResetPendingDeltas, &mut events).expect("reset");
    let snapshot = query::sprite(&world, player).expect("player alive");
    assert_eq!((snapshot.pending_dx, snapshot.pending_dy), (0, 0));
}

#[test]
fn moving_a_removed_sprite_is_an_error() {
    let mut world = setup("p.");
    let player = first(&world, PLAYER);
    world::apply(&mut world, Command::RemoveSprite { sprite: player }, &mut Vec::new())
        .expect("removed");

    let error = world::apply(
        &mut world,
        Command::MoveSprite {
            sprite: player,
            dx: 1,
            dy: 0,
        },
        &mut Vec::new(),
    )
    .expect_err("stale handle rejected");
    assert_eq!(error, EngineError::UnknownSprite(player));
}
