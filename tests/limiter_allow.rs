// tests/limiter_allow.rs

use std::time::Duration;

use rate_guard_limiter::{Limiter, ManualClock, Rate, Uint};

fn every_ms(ms: u64) -> Rate {
    Rate::every(Duration::from_millis(ms))
}

#[test]
fn test_allow_until_burst_then_refill() {
    let clock = ManualClock::new();
    let limiter = Limiter::new(every_ms(100), 2, &clock);

    assert!(limiter.allow());
    assert!(limiter.allow());
    assert!(!limiter.allow());

    // One refill interval brings back exactly one token
    clock.advance(Duration::from_millis(100));
    assert!(limiter.allow());
    assert!(!limiter.allow());
}

#[test]
fn test_allow_n_after_full_refill() {
    let clock = ManualClock::new();
    let limiter = Limiter::new(every_ms(200), 3, &clock);

    assert!(limiter.allow_n(3));
    assert!(!limiter.allow_n(1));

    // 600ms at 5/s = 3 tokens
    clock.advance(Duration::from_millis(600));
    assert!(limiter.allow_n(3));
}

#[test]
fn test_infinite_rate_admits_everything() {
    let clock = ManualClock::new();
    let limiter = Limiter::new(Rate::INFINITE, 100, &clock);

    assert!(limiter.allow_n(100_000));
    assert!(limiter.allow_n(100_000));
    assert_eq!(limiter.available_tokens(), 100.0);
}

#[test]
fn test_exactly_burst_allows_succeed() {
    for burst in [1 as Uint, 2, 5, 17, 64] {
        let clock = ManualClock::new();
        let limiter = Limiter::new(Rate::new(3.0).unwrap(), burst, &clock);

        for i in 0..burst {
            assert!(limiter.allow(), "allow #{} of burst {} should succeed", i + 1, burst);
        }
        assert!(!limiter.allow(), "allow beyond burst {} should fail", burst);
    }
}

#[test]
fn test_allow_n_beyond_burst_never_succeeds() {
    let clock = ManualClock::new();
    let limiter = Limiter::new(Rate::new(1000.0).unwrap(), 4, &clock);

    assert!(!limiter.allow_n(5));
    clock.advance(Duration::from_secs(3600));
    assert!(!limiter.allow_n(5));
    assert!(limiter.allow_n(4));
}

#[test]
fn test_refused_allow_does_not_consume() {
    let clock = ManualClock::new();
    let limiter = Limiter::new(Rate::new(1.0).unwrap(), 3, &clock);

    assert!(limiter.allow_n(2));
    assert!(!limiter.allow_n(2));
    // The refused request left the remaining token in place
    assert_eq!(limiter.available_tokens(), 1.0);
    assert!(limiter.allow_n(1));
}

#[test]
fn test_zero_tokens_always_allowed() {
    let clock = ManualClock::new();
    let limiter = Limiter::new(Rate::new(1.0).unwrap(), 1, &clock);

    assert!(limiter.allow());
    assert!(limiter.allow_n(0));

    let empty = Limiter::new(Rate::new(1.0).unwrap(), 0, &clock);
    assert!(empty.allow_n(0));
    assert!(!empty.allow());
}

#[test]
fn test_available_tokens_tracks_consumption_and_refill() {
    let clock = ManualClock::new();
    let limiter = Limiter::new(every_ms(100), 3, &clock);

    assert_eq!(limiter.available_tokens(), 3.0);

    assert!(limiter.allow_n(2));
    assert!(limiter.available_tokens() <= 1.01);

    clock.advance(Duration::from_millis(200));
    assert!(limiter.available_tokens() >= 2.9);

    // Capped at burst however long we wait
    clock.advance(Duration::from_secs(60));
    assert_eq!(limiter.available_tokens(), 3.0);
}

#[test]
fn test_available_tokens_never_negative_while_in_debt() {
    let clock = ManualClock::new();
    let limiter = Limiter::new(Rate::new(1.0).unwrap(), 2, &clock);

    let reservation = limiter.reserve_n(2);
    assert!(reservation.is_granted());
    let reservation = limiter.reserve_n(2);
    assert!(reservation.is_granted());
    assert_eq!(reservation.delay(), Duration::from_secs(2));

    assert_eq!(limiter.available_tokens(), 0.0);
    // Debt of 2 is paid back after 2s; one more second yields one token
    clock.advance(Duration::from_secs(2));
    assert_eq!(limiter.available_tokens(), 0.0);
    clock.advance(Duration::from_secs(1));
    assert_eq!(limiter.available_tokens(), 1.0);
}

#[test]
fn test_allow_at_stale_instant_uses_watermark() {
    let clock = ManualClock::new();
    let start = clock.now();
    let limiter = Limiter::new(Rate::new(1.0).unwrap(), 1, &clock);

    clock.advance(Duration::from_secs(5));
    assert!(limiter.allow());

    // An instant before the last update cannot mint tokens or rewind time
    assert!(!limiter.allow_n_at(start, 1));
    assert_eq!(limiter.available_tokens_at(start), 0.0);

    clock.advance(Duration::from_secs(1));
    assert!(limiter.allow());
}
