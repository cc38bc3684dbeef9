// Scratch-to-reveal behaviour on a full-size card (native, no canvas).

use surprise_journey::{RevealInteraction, RevealMask, RevealOutcome, RevealState};

fn card() -> RevealInteraction {
    RevealInteraction::new(RevealMask::new(400, 300, 1))
}

#[test]
fn single_stroke_clears_about_one_disc() {
    let mut reveal = card();
    reveal.begin_gesture();
    let outcome = reveal.reveal(200.0, 150.0, 20.0);

    // pi * 20^2 ~ 1257 cells
    let cleared = reveal.mask().revealed_cells();
    assert!((1232..=1282).contains(&cleared), "cleared {cleared}");
    assert!(matches!(outcome, RevealOutcome::Progress(f) if (f - cleared as f64 / 120_000.0).abs() < 1e-12));
    assert_eq!(reveal.state(), RevealState::Revealing);
}

#[test]
fn sweeping_the_card_reveals_exactly_once() {
    let mut reveal = card();
    let mut just_revealed = 0;
    let mut last = 0.0;
    for row in 0..8 {
        let y = 20.0 + row as f64 * 40.0;
        reveal.begin_gesture();
        for step in 0..=40 {
            let outcome = reveal.reveal(step as f64 * 10.0, y, 20.0);
            if outcome == RevealOutcome::JustRevealed {
                just_revealed += 1;
            }
            let f = reveal.revealed_fraction();
            assert!(f >= last, "fraction went backwards");
            last = f;
        }
        reveal.end_gesture();
    }
    assert_eq!(just_revealed, 1);
    assert_eq!(reveal.state(), RevealState::Revealed);
    assert!(reveal.revealed_fraction() > 0.5);

    // terminal: further input is ignored
    reveal.begin_gesture();
    assert_eq!(reveal.reveal(10.0, 10.0, 20.0), RevealOutcome::Ignored);
}

#[test]
fn moves_without_a_press_do_nothing() {
    let mut reveal = card();
    assert_eq!(reveal.reveal(100.0, 100.0, 20.0), RevealOutcome::Ignored);
    assert_eq!(reveal.state(), RevealState::Hidden);
    assert_eq!(reveal.revealed_fraction(), 0.0);

    reveal.begin_gesture();
    reveal.reveal(100.0, 100.0, 20.0);
    reveal.end_gesture();
    let before = reveal.revealed_fraction();
    assert_eq!(reveal.reveal(300.0, 200.0, 20.0), RevealOutcome::Ignored);
    assert_eq!(reveal.revealed_fraction(), before);
}

#[test]
fn repeated_strokes_on_one_spot_count_once() {
    let mut reveal = card();
    reveal.begin_gesture();
    reveal.reveal(50.0, 50.0, 10.0);
    let first = reveal.mask().revealed_cells();
    reveal.reveal(50.0, 50.0, 10.0);
    assert_eq!(reveal.mask().revealed_cells(), first);
}

#[test]
fn hover_after_release_in_the_same_frame_reveals_nothing() {
    use surprise_journey::PointerInput;

    let mut reveal = card();
    let mut input = PointerInput::default();
    input.press(Some((50.0, 50.0)));
    input.release();
    input.moved(Some((300.0, 200.0)));

    let mut painted = Vec::new();
    input.drain(&mut reveal, 20.0, |x, y| painted.push((x, y)));
    assert_eq!(painted, vec![(50.0, 50.0)]);
    assert!(reveal.mask().is_revealed(50, 50));
    assert!(!reveal.mask().is_revealed(300, 200));
    assert!(!reveal.gesture_active());
}

#[test]
fn drag_strokes_the_last_position_before_release() {
    use surprise_journey::PointerInput;

    let mut reveal = card();
    let mut input = PointerInput::default();
    input.press(Some((10.0, 10.0)));
    input.moved(Some((120.0, 80.0)));
    input.release();
    input.press(Some((350.0, 250.0)));

    let mut painted = Vec::new();
    input.drain(&mut reveal, 20.0, |x, y| painted.push((x, y)));
    // the second press is still held, so its point is stroked after the replay
    assert_eq!(painted, vec![(120.0, 80.0), (350.0, 250.0)]);
    assert!(reveal.gesture_active());
}
