/// Configuration for [`crate::FastList`].
///
/// All fields have sensible defaults (see [`FastListOptions::new`]); hosts usually only set
/// `viewport_height` and, when restoring a session, `initial_scroll_top`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FastListOptions {
    /// Height of the scroll container.
    ///
    /// Ignored when the data source reports its own [`crate::DataSource::viewport_height`].
    pub viewport_height: u32,

    /// Scroll offset restored during initialization, before the scroll listener is attached.
    pub initial_scroll_top: u64,

    /// `max_item_count = floor(items_per_screen * prerender_multiplier)`.
    ///
    /// The default mirrors the compositor's will-change budget of ~2.8 viewports.
    pub prerender_multiplier: f32,

    /// `switch_window = floor(items_per_screen / switch_window_divisor)`.
    pub switch_window_divisor: u32,

    /// Entering fast scroll: movement per sample exceeds this many viewports.
    pub fast_enter_viewports: f32,
    /// Leaving fast scroll: movement per sample drops below this many viewports.
    pub fast_exit_viewports: f32,

    /// Delay without scroll events after which the list is considered idle.
    pub idle_delay_ms: u64,

    /// Fade-in of an item whose population completed asynchronously.
    pub reveal_ms: u64,
    /// Slide-down of visible items when a record is inserted at the top.
    pub push_down_ms: u64,
    /// Fade-in of the record inserted at the top.
    pub new_item_reveal_ms: u64,

    /// Upper bound for every wait on a completion event.
    pub transition_timeout_ms: u64,
}

impl Default for FastListOptions {
    fn default() -> Self {
        Self::new(0)
    }
}

impl FastListOptions {
    pub fn new(viewport_height: u32) -> Self {
        Self {
            viewport_height,
            initial_scroll_top: 0,
            prerender_multiplier: 2.8,
            switch_window_divisor: 2,
            fast_enter_viewports: 2.0,
            fast_exit_viewports: 0.5,
            idle_delay_ms: 150,
            reveal_ms: 200,
            push_down_ms: 150,
            new_item_reveal_ms: 250,
            transition_timeout_ms: 500,
        }
    }

    pub fn with_viewport_height(mut self, viewport_height: u32) -> Self {
        self.viewport_height = viewport_height;
        self
    }

    pub fn with_initial_scroll_top(mut self, initial_scroll_top: u64) -> Self {
        self.initial_scroll_top = initial_scroll_top;
        self
    }

    pub fn with_prerender_multiplier(mut self, multiplier: f32) -> Self {
        self.prerender_multiplier = multiplier;
        self
    }

    pub fn with_switch_window_divisor(mut self, divisor: u32) -> Self {
        self.switch_window_divisor = divisor.max(1);
        self
    }

    /// Sets the fast-scroll hysteresis, in viewports per scroll sample.
    pub fn with_fast_scroll_thresholds(mut self, enter: f32, exit: f32) -> Self {
        debug_assert!(
            exit <= enter,
            "fast scroll exit ({exit}) above enter ({enter})"
        );
        self.fast_enter_viewports = enter;
        self.fast_exit_viewports = exit;
        self
    }

    pub fn with_idle_delay_ms(mut self, delay_ms: u64) -> Self {
        self.idle_delay_ms = delay_ms;
        self
    }

    pub fn with_reveal_ms(mut self, reveal_ms: u64) -> Self {
        self.reveal_ms = reveal_ms;
        self
    }

    pub fn with_insert_animation_ms(mut self, push_down_ms: u64, reveal_ms: u64) -> Self {
        self.push_down_ms = push_down_ms;
        self.new_item_reveal_ms = reveal_ms;
        self
    }

    pub fn with_transition_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.transition_timeout_ms = timeout_ms;
        self
    }
}
