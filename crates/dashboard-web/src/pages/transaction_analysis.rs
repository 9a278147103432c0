use dashboard_core::render::LOADING_TEXT;
use dashboard_core::{DashboardState, ReportKind};
use leptos::prelude::*;

use crate::actions;
use crate::components::{ColumnToggles, FacetDropdown, ProjectSelector, ReportTable, Section, TimeRangeInputs};
use crate::config::CONFIG;

#[component]
pub fn TransactionAnalysisPage() -> impl IntoView {
    let state = RwSignal::new(DashboardState::new(&CONFIG.catalog(), CONFIG.stale_policy));
    actions::load_initial(state);

    // Any facet, project or time range change runs one dynamic-filter cycle
    let on_filter_change = Callback::new(move |_: ()| actions::refresh_filters(state));

    let on_apply = move |_| actions::apply(state);
    let on_reset = move |_| {
        if state.try_update(|s| s.reset()).unwrap_or(false) {
            actions::refresh_filters(state);
        }
    };

    let loading = move || state.with(|s| s.is_loading());

    view! {
        <main class="max-w-full mx-auto px-4 py-6">
            <header class="mb-6">
                <h1 class="text-xl font-bold">{CONFIG.title}</h1>
            </header>

            <Section id="filters" title="Filters">
                <div class="flex flex-wrap gap-4 mb-4">
                    {CONFIG
                        .facets
                        .iter()
                        .map(|(key, _, _)| view! { <FacetDropdown state key=*key on_change=on_filter_change /> })
                        .collect_view()}
                </div>
                <ProjectSelector state on_change=on_filter_change />
                <TimeRangeInputs state on_change=on_filter_change />
                <div class="flex gap-2 mt-4">
                    <button type="button" on:click=on_apply>"Apply"</button>
                    <button type="button" on:click=on_reset>"Reset"</button>
                </div>
            </Section>

            <Section id="columns" title="Columns">
                <ColumnToggles state />
            </Section>

            <Show when=loading>
                <div class="text-[var(--ink-light)]">{LOADING_TEXT}</div>
            </Show>

            {ReportKind::ALL
                .into_iter()
                .map(|kind| {
                    view! {
                        <Section id=format!("report-{:?}", kind).to_lowercase() title=kind.title()>
                            <ReportTable state kind />
                        </Section>
                    }
                })
                .collect_view()}
        </main>
    }
}
