use log::error;
use yew::prelude::*;

use crate::components::testimonial_carousel::TestimonialCarousel;
use crate::config;
use crate::testimonials;

#[function_component(Landing)]
pub fn landing() -> Html {
    // Scroll to top only on initial mount
    {
        use_effect_with_deps(
            move |_| {
                if let Some(window) = web_sys::window() {
                    window.scroll_to_with_x_and_y(0.0, 0.0);
                }
                || ()
            },
            (),
        );
    }

    let testimonials = use_memo(
        |_| {
            testimonials::load().unwrap_or_else(|err| {
                error!("Could not load testimonials: {}", err);
                Vec::new()
            })
        },
        (),
    );

    let carousel_config = use_memo(|_| config::carousel_config(), ());

    html! {
        <main class="landing-page">
            <section id="home" class="hero-section">
                <h1>{"Run your trade business from one place"}</h1>
                <p>{"Orders, suppliers and landed costs, finally in the same spreadsheet-free workspace."}</p>
            </section>
            {
                if testimonials.is_empty() {
                    html! {}
                } else {
                    html! { <TestimonialCarousel
                        testimonials={(*testimonials).clone()}
                        config={(*carousel_config).clone()}
                    /> }
                }
            }
        </main>
    }
}
