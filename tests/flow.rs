// Screen flow: sequencer walk, prize wheel landing, per-screen controllers.

use surprise_journey::prize_wheel::{draw_prize_index, PrizeWheel, SpinSchedule, SpinStep, DEFAULT_PRIZES};
use surprise_journey::screens::{
    LoadingIndicator, MemorySlideshow, PhotoGallery, StepOutcome, TrackCommand, Typewriter, WishesStepper,
    LOADING_MESSAGES, MEMORIES, PHOTOS, WISHES,
};
use surprise_journey::sequencer::default_screens;
use surprise_journey::timing::{Deadline, Ticker};
use surprise_journey::{NavigationError, NavigationSequencer, ScreenKind};

#[test]
fn default_flow_ends_on_the_surprise() {
    let mut seq = NavigationSequencer::new(default_screens()).unwrap();
    assert_eq!(seq.current_screen().kind, ScreenKind::Welcome);
    while seq.advance().is_ok() {}
    assert_eq!(seq.current_screen().kind, ScreenKind::Surprise);
    assert_eq!(seq.advance(), Err(NavigationError::AtLastScreen));
    assert_eq!(seq.go_to(1), Ok(1));
    assert_eq!(seq.go_to(6), Err(NavigationError::OutOfRange { index: 6, len: 6 }));
    assert_eq!(seq.current(), 1);
}

#[test]
fn wheel_lands_on_the_drawn_prize_for_every_index() {
    for target in 0..DEFAULT_PRIZES.len() {
        let mut wheel = PrizeWheel::new(DEFAULT_PRIZES.to_vec(), SpinSchedule::default());
        wheel.spin(target).unwrap();
        let mut steps = 0;
        let mut last_highlight = None;
        let prize = loop {
            match wheel.step() {
                SpinStep::Continue { highlighted, .. } => {
                    steps += 1;
                    last_highlight = Some(highlighted);
                }
                SpinStep::Finished { prize } => break prize,
            }
        };
        assert_eq!(steps, 30);
        assert_eq!(last_highlight, Some(target));
        assert_eq!(prize, target);
        assert_eq!(wheel.result(), Some(target));
        assert!(!wheel.is_spinning());
    }
}

#[test]
fn wheel_slows_down_over_the_last_steps() {
    let mut wheel = PrizeWheel::new(DEFAULT_PRIZES.to_vec(), SpinSchedule::default());
    wheel.spin(4).unwrap();
    let mut delays = Vec::new();
    while let SpinStep::Continue { next_delay_ms, .. } = wheel.step() {
        delays.push(next_delay_ms);
    }
    assert!(delays[..21].iter().all(|&d| d == 50));
    assert_eq!(&delays[21..], &[70, 90, 110, 130, 150, 170, 190, 210, 230]);
    // total spin time stays in the couple-of-seconds range
    assert_eq!(delays.iter().sum::<u32>(), 21 * 50 + 1350);
}

#[test]
fn drawn_index_is_always_in_range() {
    for seed in [0.0, 1.5, 16.7, 12_345.678, 1e9] {
        assert!(draw_prize_index(9, seed) < 9);
    }
    assert_eq!(draw_prize_index(0, 3.0), 0);
}

#[test]
fn loading_indicator_never_lags_real_progress() {
    let mut ind = LoadingIndicator::default();
    assert_eq!(ind.message(), LOADING_MESSAGES[0]);
    ind.tick();
    ind.set_real_progress(0.5);
    assert_eq!(ind.percent(), 50);
    for _ in 0..200 {
        ind.tick();
    }
    assert_eq!(ind.percent(), 100);
    assert_eq!(ind.message(), LOADING_MESSAGES[4]);
}

#[test]
fn typewriter_spells_the_name_then_offers_the_button() {
    let mut tw = Typewriter::new("Ana");
    let mut ticker = Ticker::new(200.0, 0.0);
    let mut now = 0.0;
    while !tw.show_button() {
        now += 50.0;
        if ticker.poll(now) {
            tw.tick();
        }
    }
    assert_eq!(tw.visible(), "Ana");
    // three characters plus the finishing tick, 200 ms apart
    assert_eq!(now, 800.0);
}

#[test]
fn gallery_wishes_and_slideshow() {
    let mut gallery = PhotoGallery::new(PHOTOS.to_vec());
    assert!(gallery.select(PHOTOS.len()).is_err());
    gallery.select(1).unwrap();
    assert_eq!(gallery.selected().map(|p| p.src), Some(PHOTOS[1].src));
    gallery.close();
    assert!(gallery.selected().is_none());

    let mut wishes = WishesStepper::new(WISHES.to_vec());
    assert_eq!(wishes.next(), StepOutcome::Stepped(1));
    assert_eq!(wishes.next(), StepOutcome::Stepped(2));
    assert_eq!(wishes.next(), StepOutcome::Finished);

    let mut slides = MemorySlideshow::new(MEMORIES.to_vec());
    assert_eq!(slides.toggle_play(), TrackCommand::Play);
    assert!(slides.tick());
    assert!(slides.tick());
    assert!(!slides.tick(), "stops at the last memory");
    assert!(!slides.is_playing());
    assert_eq!(slides.current_index(), MEMORIES.len() - 1);
}

#[test]
fn deadline_fires_once() {
    let mut d = Deadline::default();
    d.arm(100.0, 1000.0);
    assert!(!d.poll(1099.0));
    assert!(d.poll(1100.0));
    assert!(!d.poll(5000.0));
}

#[test]
fn three_screen_flow_stops_after_two_advances() {
    use surprise_journey::Screen;
    let mut seq = NavigationSequencer::new(vec![
        Screen::new("a", ScreenKind::Welcome),
        Screen::new("b", ScreenKind::Photos),
        Screen::new("c", ScreenKind::Surprise),
    ])
    .unwrap();
    assert_eq!(seq.advance(), Ok(1));
    assert_eq!(seq.advance(), Ok(2));
    assert_eq!(seq.advance(), Err(NavigationError::AtLastScreen));
    assert_eq!(seq.current(), 2);
}
