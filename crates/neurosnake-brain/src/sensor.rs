//! Encoding of a game snapshot into the network's feature vector.
//!
//! The 24 features form three blocks of eight, each ordered
//! `[N, E, S, W, SW, SE, NW, NE]`:
//!
//! | block | features | measures                                 |
//! |-------|----------|------------------------------------------|
//! | 0     | 0..8     | head to the arena walls                  |
//! | 1     | 8..16    | head to the food                         |
//! | 2     | 16..24   | head to the body segments                |
//!
//! Every value is a proximity `1/d` rather than a distance, so closer obstacles
//! give larger signals and a missing obstacle gives `0`.
//!
//! The encoding reproduces the formulas the existing brain files were evolved
//! with, quirks included:
//!
//! - Diagonal wall/food features combine the two cardinal distances `a` and `b`
//!   as `1 / sqrt(((a ^ 2) + b) ^ 2)`, where `^` is bitwise exclusive-or.
//! - The body block's N and S features test the same condition (a segment
//!   straight above the head) and both store `1 / (head.y - segment.y)`, which is
//!   negative. No segment below the head is ever reported.
//! - Body features are overwritten by each matching segment in body order, so the
//!   segment closest to the tail wins rather than the nearest one.

use neurosnake_engine::{Coord, GameSnapshot};

use crate::network::Features;

const DIRECTIONS: usize = 8;

const N: usize = 0;
const E: usize = 1;
const S: usize = 2;
const W: usize = 3;
const SW: usize = 4;
const SE: usize = 5;
const NW: usize = 6;
const NE: usize = 7;

/// Builds the 24-element feature vector for `snapshot`.
#[must_use]
pub fn encode(snapshot: &GameSnapshot) -> Features {
    let mut features = [0.0; 3 * DIRECTIONS];
    let blocks = [
        head_to_walls(snapshot),
        head_to_food(snapshot),
        head_to_body(snapshot.snake.head, &snapshot.snake.body),
    ];
    for (chunk, block) in features.chunks_exact_mut(DIRECTIONS).zip(blocks) {
        chunk.copy_from_slice(&block);
    }
    features
}

fn head_to_walls(snapshot: &GameSnapshot) -> [f64; DIRECTIONS] {
    let head = snapshot.snake.head;
    let arena = snapshot.arena;
    cardinal_proximity(arena.height - head.y, arena.width - head.x, head.y, head.x)
}

fn head_to_food(snapshot: &GameSnapshot) -> [f64; DIRECTIONS] {
    let head = snapshot.snake.head;
    let food = snapshot.food;
    let (mut n, mut e, mut s, mut w) = (0, 0, 0, 0);
    if head.x > food.x {
        w = head.x - food.x;
    } else {
        e = food.x - head.x;
    }
    if head.y > food.y {
        s = head.y - food.y;
    } else {
        n = food.y - head.y;
    }
    cardinal_proximity(n, e, s, w)
}

fn head_to_body(head: Coord, body: &[Coord]) -> [f64; DIRECTIONS] {
    let mut res = [0.0; DIRECTIONS];
    for segment in body {
        let below = head.y - segment.y;
        let above = segment.y - head.y;
        let left = head.x - segment.x;
        let right = segment.x - head.x;

        if head.x == segment.x && head.y < segment.y {
            res[N] = inverse(below);
        }
        if head.y == segment.y && head.x < segment.x {
            res[E] = inverse(right);
        }
        if head.x == segment.x && head.y < segment.y {
            res[S] = inverse(below);
        }
        if head.y == segment.y && head.x > segment.x {
            res[W] = inverse(left);
        }
        if below == left && below > 0 {
            res[SW] = inverse(below);
        }
        if below == right && below > 0 {
            res[SE] = inverse(below);
        }
        if above == left && above > 0 {
            res[NW] = inverse(above);
        }
        if above == right && above > 0 {
            res[NE] = inverse(above);
        }
    }
    res
}

fn cardinal_proximity(n: i32, e: i32, s: i32, w: i32) -> [f64; DIRECTIONS] {
    let mut res = [0.0; DIRECTIONS];
    if n > 0 {
        res[N] = inverse(n);
    }
    if e > 0 {
        res[E] = inverse(e);
    }
    if s > 0 {
        res[S] = inverse(s);
    }
    if w > 0 {
        res[W] = inverse(w);
    }
    if s > 0 && w > 0 {
        res[SW] = diagonal(s, w);
    }
    if s > 0 && e > 0 {
        res[SE] = diagonal(s, e);
    }
    if n > 0 && w > 0 {
        res[NW] = diagonal(n, w);
    }
    if n > 0 && e > 0 {
        res[NE] = diagonal(n, e);
    }
    res
}

fn inverse(d: i32) -> f64 {
    1.0 / f64::from(d)
}

/// Exclusive-or based combination of two cardinal distances (see module docs).
fn diagonal(a: i32, b: i32) -> f64 {
    1.0 / f64::from(((a ^ 2) + b) ^ 2).sqrt()
}
