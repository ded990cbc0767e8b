use coin_counter::core::{Image, CENTROID_COLOR};
use coin_counter::{CoinCounter, CoinCounterParams, Denomination, TrackOutcome};

const WIDTH: usize = 200;
const HEIGHT: usize = 160;
/// Capture-order (BGR) color inside the first default HSV window.
const COIN_BGR: [u8; 3] = [50, 88, 100];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn blank() -> Image {
    Image::new(WIDTH, HEIGHT, 3).expect("frame")
}

fn with_disc(cx: i64, cy: i64, radius: i64) -> Image {
    let mut frame = blank();
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let (dx, dy) = (x as i64 - cx, y as i64 - cy);
            if dx * dx + dy * dy <= radius * radius {
                frame.put_color(x, y, COIN_BGR);
            }
        }
    }
    frame
}

fn with_square(x0: usize, y0: usize, side: usize) -> Image {
    let mut frame = blank();
    for y in y0..y0 + side {
        for x in x0..x0 + side {
            frame.put_color(x, y, COIN_BGR);
        }
    }
    frame
}

fn counter() -> CoinCounter {
    CoinCounter::new(WIDTH, HEIGHT, CoinCounterParams::default()).expect("counter")
}

#[test]
fn coin_is_counted_once_while_it_stays_in_the_band() {
    init_logger();
    let mut counter = counter();

    let first = counter.process_frame(&with_disc(100, 80, 40)).expect("frame 1");
    assert_eq!(first.blobs.len(), 1);
    let blob = first.blobs[0];
    assert_eq!((blob.xc, blob.yc), (100, 80));
    assert_eq!(
        first.tracked[0].outcome,
        TrackOutcome::Counted {
            denomination: Denomination::OneCent
        }
    );
    assert_eq!(first.newly_counted, 1);
    assert_eq!(counter.canvas().pixel(100, 80), &CENTROID_COLOR);

    let second = counter.process_frame(&with_disc(105, 80, 40)).expect("frame 2");
    assert_eq!(second.tracked.len(), 1);
    assert_eq!(second.tracked[0].outcome, TrackOutcome::AlreadyCounted);
    assert_eq!(second.newly_counted, 0);

    // a frame without coins clears the tracker memory
    let third = counter.process_frame(&blank()).expect("frame 3");
    assert!(third.blobs.is_empty());
    assert!(counter.tracker().previous().is_empty());

    let fourth = counter.process_frame(&with_disc(100, 80, 40)).expect("frame 4");
    assert_eq!(fourth.newly_counted, 1);

    let tally = counter.tally();
    assert_eq!(tally.coins(), 2);
    assert_eq!(tally.count(Denomination::OneCent), 2);
    assert_eq!(tally.total_cents(), 2);
    assert_eq!(fourth.tally, *tally);
}

#[test]
fn coin_outside_the_band_is_detected_but_not_counted() {
    init_logger();
    let mut counter = counter();
    let report = counter.process_frame(&with_disc(100, 35, 30)).expect("frame");
    assert_eq!(report.blobs.len(), 1);
    assert!(report.tracked.is_empty());
    assert_eq!(counter.tally().coins(), 0);
}

#[test]
fn square_objects_are_rejected() {
    init_logger();
    let mut counter = counter();
    let report = counter.process_frame(&with_square(70, 50, 60)).expect("frame");
    assert!(report.blobs.is_empty());
    assert!(report.tracked.is_empty());
}

#[test]
fn prefilter_can_be_disabled() {
    init_logger();
    let params = CoinCounterParams {
        median_kernel: None,
        ..CoinCounterParams::default()
    };
    let mut counter = CoinCounter::new(WIDTH, HEIGHT, params).expect("counter");
    let report = counter.process_frame(&with_disc(100, 80, 40)).expect("frame");

    // the unfiltered disc spans the full 81 px diameter
    let blob = report.blobs[0];
    assert_eq!((blob.x, blob.xf, blob.width), (60, 140, 81));
    assert_eq!(blob.perimeter, 251);
    assert_eq!(report.newly_counted, 1);
}

#[test]
fn reset_starts_a_new_count() {
    init_logger();
    let mut counter = counter();
    counter.process_frame(&with_disc(100, 80, 40)).expect("frame");
    assert_eq!(counter.tally().coins(), 1);

    counter.reset();
    assert_eq!(counter.tally().coins(), 0);
    let report = counter.process_frame(&with_disc(100, 80, 40)).expect("frame");
    assert_eq!(report.frame_index, 0);
    assert_eq!(report.newly_counted, 1);
}

#[test]
fn skipped_frame_counts_as_empty() {
    init_logger();
    let mut counter = counter();
    counter.process_frame(&with_disc(100, 80, 40)).expect("frame 0");

    let skipped = counter.skip_frame();
    assert_eq!(skipped.frame_index, 1);
    assert!(skipped.blobs.is_empty());
    assert!(counter.tracker().previous().is_empty());

    // same position after the gap is a new coin
    let report = counter.process_frame(&with_disc(100, 80, 40)).expect("frame 2");
    assert_eq!(report.frame_index, 2);
    assert_eq!(report.newly_counted, 1);
    assert_eq!(counter.tally().coins(), 2);
}
