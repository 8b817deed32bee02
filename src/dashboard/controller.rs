use crate::acquire::{acquire, Acquired};
use crate::error::FetchError;
use crate::formatters::CardText;
use crate::models::{ChartSeries, MetricCard, ViewMode};
use crate::render;
use crate::sources::DataSource;
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use super::animation::Tween;

pub const LOADING_TEXT: &str = "Loading...";

/// A finished acquisition, tagged with the epoch that started it
#[derive(Debug)]
pub struct Completion {
    pub epoch: u64,
    pub mode: ViewMode,
    pub result: Result<Acquired, FetchError>,
}

/// State of the loading/error line above the cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Hidden,
    Loading,
    Error(&'static str),
}

impl Indicator {
    pub fn text(&self) -> Option<&'static str> {
        match self {
            Indicator::Hidden => None,
            Indicator::Loading => Some(LOADING_TEXT),
            Indicator::Error(message) => Some(*message),
        }
    }
}

/// A card plus the animations counting its numbers up
#[derive(Debug, Clone)]
pub struct AnimatedCard {
    pub card: MetricCard,
    primary: Tween,
    secondary: Option<Tween>,
}

impl AnimatedCard {
    fn new(card: MetricCard, started_at: Instant, duration: Duration) -> Self {
        let primary = Tween::from_zero(card.primary_value, started_at, duration);
        let secondary = card
            .secondary_value
            .map(|value| Tween::from_zero(value, started_at, duration));
        Self {
            card,
            primary,
            secondary,
        }
    }

    /// Text for the frame drawn at `now`. The tone comes from the target so
    /// the color doesn't flip while a negative change counts down from zero.
    pub fn text_at(&self, now: Instant) -> CardText {
        let mut frame = self.card.clone();
        frame.primary_value = self.primary.value_at(now);
        frame.secondary_value = self.secondary.map(|tween| tween.value_at(now));

        let mut text = CardText::from(&frame);
        text.tone = CardText::from(&self.card).tone;
        text
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        !self.primary.is_done(now) || self.secondary.is_some_and(|tween| !tween.is_done(now))
    }
}

/// Everything the presentation layer draws. The controller is the only writer.
#[derive(Debug, Clone)]
pub struct Screen {
    pub indicator: Indicator,
    pub cards_visible: bool,
    pub cards: Vec<AnimatedCard>,
    pub chart_visible: bool,
    pub last_update: Option<DateTime<Local>>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            indicator: Indicator::Loading,
            cards_visible: false,
            cards: Vec::new(),
            chart_visible: false,
            last_update: None,
        }
    }
}

impl Screen {
    fn clear(&mut self) {
        self.cards.clear();
        self.cards_visible = false;
        self.chart_visible = false;
        self.indicator = Indicator::Loading;
    }

    pub fn card_texts(&self, now: Instant) -> Vec<CardText> {
        self.cards.iter().map(|card| card.text_at(now)).collect()
    }
}

/// A live chart. Dropping it is disposal.
#[derive(Debug)]
pub struct ChartInstance {
    id: u64,
    series: ChartSeries,
    live: Arc<AtomicUsize>,
}

impl ChartInstance {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }
}

impl Drop for ChartInstance {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        debug!("Disposed chart #{} ({})", self.id, self.series.title);
    }
}

/// Single owner of the chart. At most one instance exists at a time.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<ChartInstance>,
    created: u64,
    live: Arc<AtomicUsize>,
}

impl ChartSlot {
    /// Dispose of the current chart, then build a new one from `series`
    pub fn replace(&mut self, series: ChartSeries) -> &ChartInstance {
        self.dispose();
        self.created += 1;
        self.live.fetch_add(1, Ordering::SeqCst);
        debug!("Created chart #{} ({:?})", self.created, series.style);
        self.current.insert(ChartInstance {
            id: self.created,
            series,
            live: Arc::clone(&self.live),
        })
    }

    pub fn dispose(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&ChartInstance> {
        self.current.as_ref()
    }

    /// Number of chart instances not yet disposed
    pub fn live_instances(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Fixed-interval refresh, independent of user input
#[derive(Debug, Clone, Copy)]
pub struct RefreshTimer {
    interval: Duration,
    last: Instant,
}

impl RefreshTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last: now,
        }
    }

    /// True once per elapsed interval
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last))
    }
}

/// Owns the view selector, starts fetches, and turns their results into
/// cards and a chart.
///
/// Fetches run as detached tasks and are never cancelled. Each one carries
/// the epoch that was current when it started; [Controller::apply] drops any
/// result whose epoch has since been superseded.
pub struct Controller {
    source: Arc<dyn DataSource>,
    mode: ViewMode,
    epoch: u64,
    animation: Duration,
    screen: Screen,
    chart: ChartSlot,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
}

impl Controller {
    pub fn new(source: Arc<dyn DataSource>, mode: ViewMode, animation: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            mode,
            epoch: 0,
            animation,
            screen: Screen::default(),
            chart: ChartSlot::default(),
            tx,
            rx,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn chart(&self) -> &ChartSlot {
        &self.chart
    }

    /// Switch views. Clears whatever is showing and starts a fetch for the
    /// new mode.
    pub fn set_view(&mut self, mode: ViewMode) {
        info!("Switching view {} -> {}", self.mode, mode);
        self.mode = mode;
        self.refresh();
    }

    /// Clear to the loading state and start fetching the current mode under a
    /// new epoch. Any fetch already in flight becomes stale.
    pub fn refresh(&mut self) {
        self.epoch += 1;
        self.clear();

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let (epoch, mode) = (self.epoch, self.mode);
        debug!("Refreshing {} (epoch {})", mode, epoch);

        tokio::spawn(async move {
            let result = acquire(source.as_ref(), mode).await;
            // Only fails if the controller is gone, nobody to tell
            let _ = tx.send(Completion {
                epoch,
                mode,
                result,
            });
        });
    }

    fn clear(&mut self) {
        self.screen.clear();
        self.chart.dispose();
    }

    /// Render a finished fetch. Returns false if it was stale and dropped.
    pub fn apply(&mut self, completion: Completion, now: Instant) -> bool {
        if completion.epoch != self.epoch {
            debug!(
                "Dropping stale {} result (epoch {}, current {})",
                completion.mode, completion.epoch, self.epoch
            );
            return false;
        }

        match completion.result {
            Ok(acquired) => {
                let (cards, series) = render::build(&acquired);
                self.render(cards, series, now);
            }
            Err(err) => {
                error!(
                    "Error loading {} data: {:#}",
                    completion.mode,
                    anyhow::Error::from(err)
                );
                self.screen.indicator = Indicator::Error(completion.mode.error_message());
            }
        }
        true
    }

    fn render(&mut self, cards: Vec<MetricCard>, series: ChartSeries, now: Instant) {
        info!("Rendering {} cards for {}", cards.len(), self.mode);
        self.screen.indicator = Indicator::Hidden;
        self.screen.cards_visible = true;
        self.screen.cards = cards
            .into_iter()
            .map(|card| AnimatedCard::new(card, now, self.animation))
            .collect();

        self.chart.replace(series);
        self.screen.chart_visible = true;
        self.screen.last_update = Some(Local::now());
    }

    /// Apply every completion that has already arrived. Returns how many
    /// were rendered.
    pub fn drain(&mut self, now: Instant) -> usize {
        let mut rendered = 0;
        while let Ok(completion) = self.rx.try_recv() {
            if self.apply(completion, now) {
                rendered += 1;
            }
        }
        rendered
    }

    /// Wait for the next completion, stale or not
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.screen.cards.iter().any(|card| card.is_animating(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::fake::FakeSource;
    use crate::formatters::Tone;
    use crate::models::ChartStyle;

    const ANIMATION: Duration = Duration::from_millis(1500);

    fn controller(source: FakeSource, mode: ViewMode) -> Controller {
        Controller::new(Arc::new(source), mode, ANIMATION)
    }

    /// Wait for one completion and apply it
    async fn settle(controller: &mut Controller) -> bool {
        let completion = controller.next_completion().await.unwrap();
        controller.apply(completion, Instant::now())
    }

    fn settled_texts(controller: &Controller) -> Vec<CardText> {
        controller
            .screen()
            .card_texts(Instant::now() + ANIMATION + Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_crypto_cards() {
        let mut controller = controller(FakeSource::new(), ViewMode::Crypto);
        controller.refresh();
        assert!(settle(&mut controller).await);

        let screen = controller.screen();
        assert!(screen.cards_visible);
        assert_eq!(screen.indicator, Indicator::Hidden);

        let texts = settled_texts(&controller);
        let labels: Vec<_> = texts.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Bitcoin", "Ethereum", "Dogecoin"]);
        assert_eq!(texts[0].primary, "50,000");
        assert_eq!(texts[0].secondary.as_deref(), Some("2.50"));
        assert_eq!(texts[0].tone, Tone::Positive);
        assert_eq!(texts[1].secondary.as_deref(), Some("-1.20"));
        assert_eq!(texts[1].tone, Tone::Negative);

        let chart = controller.chart().current().unwrap();
        assert_eq!(chart.series().style, ChartStyle::Bar);
        assert!(screen.chart_visible);
    }

    #[tokio::test]
    async fn test_values_animate_from_zero() {
        let mut controller = controller(FakeSource::new(), ViewMode::Crypto);
        controller.refresh();
        let completion = controller.next_completion().await.unwrap();
        let t0 = Instant::now();
        controller.apply(completion, t0);

        let first = controller.screen().card_texts(t0);
        assert_eq!(first[0].primary, "0");
        assert_eq!(first[0].secondary.as_deref(), Some("0.00"));
        // Negative change keeps its color while counting
        assert_eq!(first[1].tone, Tone::Negative);

        let halfway = controller.screen().card_texts(t0 + ANIMATION / 2);
        assert_eq!(halfway[0].primary, "25,000");
        assert!(controller.is_animating(t0 + ANIMATION / 2));
        assert!(!controller.is_animating(t0 + ANIMATION));
    }

    #[tokio::test]
    async fn test_weather_order_regardless_of_latency() {
        let mut source = FakeSource::new();
        source.latency.insert("Berlin", Duration::from_millis(50));
        source.latency.insert("London", Duration::from_millis(25));

        let mut controller = controller(source, ViewMode::Weather);
        controller.refresh();
        assert!(settle(&mut controller).await);

        let texts = settled_texts(&controller);
        let labels: Vec<_> = texts.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Berlin", "London", "New York"]);
        assert_eq!(texts[0].primary, "12");
        assert_eq!(texts[0].primary_unit, Some("°C"));
        assert_eq!(texts[1].secondary.as_deref(), Some("22"));
        assert_eq!(texts[2].primary, "-4");

        let chart = controller.chart().current().unwrap();
        assert_eq!(chart.series().style, ChartStyle::Line);
        assert_eq!(chart.series().labels, vec!["Berlin", "London", "New York"]);
    }

    #[tokio::test]
    async fn test_switch_view_clears_before_data_arrives() {
        let mut source = FakeSource::new();
        source.latency.insert("Berlin", Duration::from_millis(50));
        let mut controller = controller(source, ViewMode::Crypto);
        controller.refresh();
        settle(&mut controller).await;
        assert_eq!(controller.screen().cards.len(), 3);

        controller.set_view(ViewMode::Weather);
        let screen = controller.screen();
        assert_eq!(controller.mode(), ViewMode::Weather);
        assert!(screen.cards.is_empty());
        assert!(!screen.cards_visible);
        assert!(!screen.chart_visible);
        assert_eq!(screen.indicator, Indicator::Loading);
        assert!(controller.chart().current().is_none());

        // Clearing again changes nothing
        controller.clear();
        assert!(controller.screen().cards.is_empty());
        assert_eq!(controller.screen().indicator, Indicator::Loading);
    }

    #[tokio::test]
    async fn test_crypto_failure_shows_error() {
        let mut source = FakeSource::new();
        source.fail_crypto = true;
        let mut controller = controller(source, ViewMode::Crypto);
        controller.refresh();
        assert!(settle(&mut controller).await);

        let screen = controller.screen();
        assert_eq!(screen.indicator.text(), Some("Error loading crypto data."));
        assert!(!screen.cards_visible);
        assert!(screen.cards.is_empty());
        assert!(!screen.chart_visible);
        assert!(controller.chart().current().is_none());
    }

    #[tokio::test]
    async fn test_weather_failure_blanks_whole_refresh() {
        let mut source = FakeSource::new();
        source.fail_city = Some("New York");
        let mut controller = controller(source, ViewMode::Weather);
        controller.refresh();
        assert!(settle(&mut controller).await);

        let screen = controller.screen();
        assert_eq!(screen.indicator.text(), Some("Error loading weather data."));
        assert!(!screen.cards_visible);
        assert!(screen.cards.is_empty());
    }

    #[tokio::test]
    async fn test_missing_asset_shows_error() {
        let mut source = FakeSource::new();
        source.prices.remove("dogecoin");
        let mut controller = controller(source, ViewMode::Crypto);
        controller.refresh();
        settle(&mut controller).await;
        assert_eq!(
            controller.screen().indicator,
            Indicator::Error("Error loading crypto data.")
        );
    }

    #[tokio::test]
    async fn test_repeated_refresh_is_idempotent() {
        let mut controller = controller(FakeSource::new(), ViewMode::Crypto);
        controller.refresh();
        settle(&mut controller).await;
        let texts = settled_texts(&controller);
        let series = controller.chart().current().unwrap().series().clone();

        controller.refresh();
        settle(&mut controller).await;
        assert_eq!(settled_texts(&controller), texts);
        assert_eq!(controller.chart().current().unwrap().series(), &series);
    }

    #[tokio::test]
    async fn test_stale_result_is_dropped() {
        let mut source = FakeSource::new();
        source.crypto_delay = Duration::from_millis(100);
        let mut controller = controller(source, ViewMode::Crypto);

        controller.refresh();
        controller.set_view(ViewMode::Weather);
        assert_eq!(controller.epoch(), 2);

        // Weather is fast and lands first
        let first = controller.next_completion().await.unwrap();
        assert_eq!(first.mode, ViewMode::Weather);
        assert!(controller.apply(first, Instant::now()));

        // Slow crypto result from the old epoch must not overwrite it
        let second = controller.next_completion().await.unwrap();
        assert_eq!(second.mode, ViewMode::Crypto);
        assert!(!controller.apply(second, Instant::now()));

        let texts = settled_texts(&controller);
        assert_eq!(texts[0].label, "Berlin");
        assert_eq!(
            controller.chart().current().unwrap().series().style,
            ChartStyle::Line
        );
    }

    #[tokio::test]
    async fn test_drain_applies_arrived_results() {
        let mut controller = controller(FakeSource::new(), ViewMode::Crypto);
        controller.refresh();
        assert_eq!(controller.drain(Instant::now()), 0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(controller.drain(Instant::now()), 1);
        assert_eq!(controller.screen().cards.len(), 3);
    }

    #[tokio::test]
    async fn test_chart_replaced_not_leaked() {
        let mut controller = controller(FakeSource::new(), ViewMode::Crypto);
        for _ in 0..3 {
            controller.refresh();
            settle(&mut controller).await;
            assert_eq!(controller.chart().live_instances(), 1);
        }
        assert_eq!(controller.chart().current().unwrap().id(), 3);

        controller.set_view(ViewMode::Weather);
        assert_eq!(controller.chart().live_instances(), 0);
    }

    #[test]
    fn test_chart_slot_disposes_previous() {
        let mut slot = ChartSlot::default();
        let series = render::crypto_chart(&[]);
        assert_eq!(slot.replace(series.clone()).id(), 1);
        assert_eq!(slot.replace(series).id(), 2);
        assert_eq!(slot.live_instances(), 1);
        slot.dispose();
        assert_eq!(slot.live_instances(), 0);
    }

    #[test]
    fn test_refresh_timer() {
        let t0 = Instant::now();
        let mut timer = RefreshTimer::new(Duration::from_secs(60), t0);
        assert!(!timer.poll(t0 + Duration::from_secs(59)));
        assert_eq!(
            timer.remaining(t0 + Duration::from_secs(59)),
            Duration::from_secs(1)
        );
        assert!(timer.poll(t0 + Duration::from_secs(60)));
        // Next tick is a full interval later
        assert!(!timer.poll(t0 + Duration::from_secs(61)));
        assert!(timer.poll(t0 + Duration::from_secs(120)));
    }
}
