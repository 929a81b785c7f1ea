//! Plays every built-in level with its model solution

use std::cell::RefCell;
use std::rc::Rc;

use rolling_ball::consts::SIM_DT;
use rolling_ball::{LevelBlueprint, RoundEnd, Simulator, parse};

const MAX_SECS: f64 = 30.0;

fn play(level_id: u32, equations: &[&str]) -> (Option<RoundEnd>, Vec<(bool, f64)>) {
    let blueprint = LevelBlueprint::by_id(level_id).unwrap();
    let ends = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&ends);
    let mut sim = Simulator::new(blueprint.instantiate(), move |won, secs| {
        sink.borrow_mut().push((won, secs));
    });

    for equation in equations {
        let (expression, condition) = equation.split_once(';').unwrap_or((*equation, ""));
        sim.add_graph(parse(expression, condition).unwrap().unwrap());
    }

    sim.toggle_playing();
    let ticks = (MAX_SECS / SIM_DT) as u32;
    let end = (0..ticks).find_map(|_| sim.update());
    assert!(!sim.is_playing());
    let ends = ends.borrow().clone();
    (end, ends)
}

fn assert_wins_within(level_id: u32, equations: &[&str], max_secs: f64) {
    let (end, callbacks) = play(level_id, equations);
    let end = end.unwrap_or_else(|| panic!("level {level_id} did not finish"));
    assert!(end.won, "level {level_id} lost after {:.2}s", end.elapsed_secs);
    assert!(
        end.elapsed_secs < max_secs,
        "level {level_id} took {:.2}s",
        end.elapsed_secs
    );
    assert_eq!(callbacks, vec![(true, end.elapsed_secs)]);

    let blueprint = LevelBlueprint::by_id(level_id).unwrap();
    assert!(blueprint.score(equations.len(), end.elapsed_secs) > 0.99);
}

#[test]
fn test_level_1() {
    assert_wins_within(0, &["1/3x+1.5"], 9.0);
}

#[test]
fn test_level_2() {
    assert_wins_within(1, &["-cos(x/1.2)*2-1.4"], 12.6);
}

#[test]
fn test_level_3() {
    assert_wins_within(2, &["-2.5*e^(-x^2/(2*1.5^2))+1+max(0,x/4)"], 9.4);
}

#[test]
fn test_level_4() {
    assert_wins_within(3, &["sin(t/2)+max(0,1.7*sin(x/2.15))"], 8.25);
}

#[test]
fn test_level_5() {
    assert_wins_within(4, &["4sin(t/2)+sin(t/4)+sin(t/6)"], 7.9);
}

#[test]
fn test_no_graphs_falls_out() {
    let (end, callbacks) = play(0, &[]);
    let end = end.unwrap();
    assert!(!end.won);
    assert_eq!(callbacks.len(), 1);
}

#[test]
fn test_flat_line_hits_spikes() {
    // Level 2 has a spike column at x = -4 reaching down to y = -7
    let (end, _) = play(1, &["-3.4"]);
    let end = end.unwrap();
    assert!(!end.won);
    assert!(end.elapsed_secs < 3.0);
}

#[test]
fn test_condition_splits_the_track() {
    // Two half ramps that together equal the level 1 solution
    let (end, _) = play(0, &["1/3x+1.5;x<0", "1/3x+1.5;x>=0"]);
    assert!(end.unwrap().won);
}
