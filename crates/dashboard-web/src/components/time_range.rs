use dashboard_core::{DashboardState, TimeRange};
use leptos::ev::Event;
use leptos::prelude::*;

/// One of the four time range inputs
#[derive(Clone, Copy)]
enum Bound {
    ProductionStart,
    ProductionEnd,
    TransactionStart,
    TransactionEnd,
}

impl Bound {
    const ALL: [Bound; 4] = [
        Bound::ProductionStart,
        Bound::ProductionEnd,
        Bound::TransactionStart,
        Bound::TransactionEnd,
    ];

    fn label(self) -> &'static str {
        match self {
            Bound::ProductionStart => "Production from",
            Bound::ProductionEnd => "Production to",
            Bound::TransactionStart => "Transaction from",
            Bound::TransactionEnd => "Transaction to",
        }
    }

    /// Production bounds are months, transaction bounds are days
    fn input_type(self) -> &'static str {
        match self {
            Bound::ProductionStart | Bound::ProductionEnd => "month",
            Bound::TransactionStart | Bound::TransactionEnd => "date",
        }
    }

    fn get(self, range: &TimeRange) -> &str {
        match self {
            Bound::ProductionStart => &range.production_start_month,
            Bound::ProductionEnd => &range.production_end_month,
            Bound::TransactionStart => &range.transaction_start_date,
            Bound::TransactionEnd => &range.transaction_end_date,
        }
    }

    fn field(self, range: &mut TimeRange) -> &mut String {
        match self {
            Bound::ProductionStart => &mut range.production_start_month,
            Bound::ProductionEnd => &mut range.production_end_month,
            Bound::TransactionStart => &mut range.transaction_start_date,
            Bound::TransactionEnd => &mut range.transaction_end_date,
        }
    }
}

#[component]
pub fn TimeRangeInputs(state: RwSignal<DashboardState>, on_change: Callback<()>) -> impl IntoView {
    view! {
        <div class="time-range flex flex-wrap gap-4">
            {Bound::ALL
                .into_iter()
                .map(|bound| {
                    let value = move || state.with(|s| bound.get(s.time_range()).to_string());
                    let on_input = move |ev: Event| {
                        let raw = event_target_value(&ev);
                        state.update(|s| *bound.field(s.time_range_mut()) = raw);
                        on_change.run(());
                    };
                    view! {
                        <label>
                            {bound.label()} " "
                            <input type=bound.input_type() prop:value=value on:change=on_input />
                        </label>
                    }
                })
                .collect_view()}
        </div>
    }
}
