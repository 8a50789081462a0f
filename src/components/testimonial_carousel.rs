use log::warn;
use yew::prelude::*;

use crate::carousel::dom::{self, DOTS_ID, NEXT_ID, PREV_ID, TRACK_ID, WRAPPER_ID};
use crate::config::CarouselConfig;
use crate::testimonials::Testimonial;

#[derive(Properties, PartialEq)]
pub struct TestimonialCarouselProps {
    pub testimonials: Vec<Testimonial>,
    #[prop_or_default]
    pub config: CarouselConfig,
}

/// Gap and transition length have to agree with the controller's config.
fn carousel_css(config: &CarouselConfig) -> String {
    format!(
        r#"
        .testimonial-carousel-container {{
            display: flex;
            align-items: center;
            gap: 1rem;
            max-width: 1200px;
            margin: 0 auto;
        }}
        .testimonial-wrapper {{
            flex: 1;
            overflow: hidden;
            touch-action: pan-y;
        }}
        .testimonial-track {{
            display: flex;
            gap: {gap}px;
            transition: transform {transition}ms ease-in-out;
            will-change: transform;
            cursor: grab;
            user-select: none;
        }}
        .testimonial-track.no-transition {{
            transition: none;
        }}
        .testimonial-card {{
            flex: 0 0 auto;
            box-sizing: border-box;
            padding: 2rem;
            border-radius: 1rem;
            background: #fff;
            box-shadow: 0 8px 24px rgba(15, 23, 42, 0.08);
        }}
        .testimonial-avatar {{
            width: 48px;
            height: 48px;
            border-radius: 50%;
            display: flex;
            align-items: center;
            justify-content: center;
            background: #3B82F6;
            color: #fff;
            font-weight: bold;
        }}
        .testimonial-nav {{
            width: 44px;
            height: 44px;
            border-radius: 50%;
            border: 1px solid #e2e8f0;
            background: #fff;
            cursor: pointer;
        }}
        .testimonial-dots {{
            display: flex;
            justify-content: center;
            gap: 0.5rem;
            margin-top: 1.5rem;
        }}
        .testimonial-dot {{
            width: 10px;
            height: 10px;
            border: none;
            border-radius: 50%;
            background: #cbd5e1;
            cursor: pointer;
        }}
        .testimonial-dot.active {{
            background: #3B82F6;
        }}
        "#,
        gap = config.gap_px,
        transition = config.transition_ms,
    )
}

#[function_component(TestimonialCarousel)]
pub fn testimonial_carousel(props: &TestimonialCarouselProps) -> Html {
    {
        // Remount when the config changes so the controller and the CSS agree.
        use_effect_with_deps(
            move |(_, config): &(Vec<Testimonial>, CarouselConfig)| {
                let mounted = match web_sys::window().and_then(|w| w.document()) {
                    Some(document) => dom::mount(&document, config.clone())
                        .map_err(|err| warn!("Testimonial carousel disabled: {}", err))
                        .ok(),
                    None => None,
                };
                move || drop(mounted)
            },
            (props.testimonials.clone(), props.config.clone()),
        );
    }

    html! {
        <section id="testimonials" class="testimonials-section">
            <style>{carousel_css(&props.config)}</style>
            <h2>{"What our customers say"}</h2>
            <div class="testimonial-carousel-container">
                <button id={PREV_ID} type="button" class="testimonial-nav" aria-label="Previous testimonial">
                    {"‹"}
                </button>
                <div id={WRAPPER_ID} class="testimonial-wrapper">
                    <div id={TRACK_ID} class="testimonial-track">
                        { for props.testimonials.iter().map(|testimonial| html! {
                            <article class="testimonial-card">
                                <p class="testimonial-quote">{format!("“{}”", testimonial.quote)}</p>
                                <div class="testimonial-author">
                                    <span class="testimonial-avatar">{testimonial.initials()}</span>
                                    <div>
                                        <div class="testimonial-name">{&testimonial.name}</div>
                                        <div class="testimonial-role">{&testimonial.role}</div>
                                    </div>
                                </div>
                            </article>
                        }) }
                    </div>
                </div>
                <button id={NEXT_ID} type="button" class="testimonial-nav" aria-label="Next testimonial">
                    {"›"}
                </button>
            </div>
            <div id={DOTS_ID} class="testimonial-dots"></div>
        </section>
    }
}
