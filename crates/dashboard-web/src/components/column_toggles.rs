use dashboard_core::{DashboardState, Metric};
use leptos::ev::Event;
use leptos::prelude::*;

/// Quantity / amount / average toggles; display only, no fetch
#[component]
pub fn ColumnToggles(state: RwSignal<DashboardState>) -> impl IntoView {
    view! {
        <div class="flex gap-4">
            {Metric::ALL
                .into_iter()
                .map(|metric| {
                    let checked = move || state.with(|s| s.columns().is_visible(metric));
                    let on_toggle = move |ev: Event| {
                        let visible = event_target_checked(&ev);
                        state.update(|s| s.set_column(metric, visible));
                    };
                    view! {
                        <label>
                            <input type="checkbox" prop:checked=checked on:change=on_toggle />
                            " " {metric.label()}
                        </label>
                    }
                })
                .collect_view()}
        </div>
    }
}
