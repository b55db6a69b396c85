use std::time::{Duration, Instant};

use folio::{
    Area, CurlView, GestureState, GestureStateMachine, PageSlot, TouchFrame, ViewConfig,
    ViewEvent, ViewState,
};
use lyon::math::point;

fn setup() -> (GestureStateMachine, CurlView) {
    let mut machine = GestureStateMachine::default();
    machine.transformer_mut().set_screen_size(800.0, 800.0);

    let mut view = CurlView::new(ViewConfig::default());
    view.set_page_count(10);
    view.set_viewport(800, 800);
    view.take_events();
    view.take_render_request();

    (machine, view)
}

fn feed(machine: &mut GestureStateMachine, view: &mut CurlView, frame: TouchFrame) {
    let view_state = view.view_state();
    machine.process(&frame, view_state, view);
}

#[test]
fn single_finger_curl_turns_the_page() {
    let (mut machine, mut view) = setup();

    // Grab the right page edge (outside the neutral band) and pull left.
    feed(&mut machine, &mut view, TouchFrame::down(point(780.0, 400.0)));
    assert_eq!(machine.state(), GestureState::Curving);
    assert!(view.renderer().draw_order().contains(&PageSlot::Curl));

    for x in [700.0, 550.0, 400.0, 300.0] {
        feed(&mut machine, &mut view, TouchFrame::moved(point(x, 400.0)));
        assert_eq!(machine.state(), GestureState::Curving);
    }
    // Mid-drag the curling mesh is genuinely curled.
    assert!(view.mesh(PageSlot::Curl).back_count() > 0);

    feed(&mut machine, &mut view, TouchFrame::up(point(250.0, 400.0)));
    assert_eq!(machine.state(), GestureState::Final);

    // The release animation settles the page to the left.
    view.update_animation(Instant::now() + Duration::from_secs(1));
    assert_eq!(view.page_index(), 1);
    assert!(view.take_events().contains(&ViewEvent::PageChanged(1)));

    // The next frame re-enters Init and a new gesture can start.
    feed(&mut machine, &mut view, TouchFrame::down(point(780.0, 400.0)));
    assert_eq!(machine.state(), GestureState::Curving);
}

#[test]
fn cancelled_curl_animates_back_without_changing_the_page() {
    let (mut machine, mut view) = setup();

    feed(&mut machine, &mut view, TouchFrame::down(point(780.0, 400.0)));
    feed(&mut machine, &mut view, TouchFrame::moved(point(600.0, 400.0)));
    feed(&mut machine, &mut view, TouchFrame::cancel(point(600.0, 400.0)));
    assert_eq!(machine.state(), GestureState::Final);

    view.update_animation(Instant::now() + Duration::from_secs(1));
    assert_eq!(view.page_index(), 0);
    // The right slot is flat again.
    assert_eq!(view.mesh(PageSlot::Right).back_count(), 0);
}

#[test]
fn pinch_zoom_hands_off_to_panning() {
    let (mut machine, mut view) = setup();
    let near = [point(300.0, 400.0), point(500.0, 400.0)];
    let far = [point(100.0, 400.0), point(700.0, 400.0)];

    feed(&mut machine, &mut view, TouchFrame::down(point(40.0, 400.0)));
    feed(&mut machine, &mut view, TouchFrame::pointer_down(&near));
    assert_eq!(machine.state(), GestureState::Resizing);

    // Fingers spread apart: the view zooms in.
    feed(&mut machine, &mut view, TouchFrame::multi_move(&near));
    feed(&mut machine, &mut view, TouchFrame::multi_move(&far));
    assert_eq!(view.view_state(), ViewState::Resized);

    // Lifting one finger completes the resize and starts a pan on the
    // remaining finger.
    feed(&mut machine, &mut view, TouchFrame::pointer_up(&far, 0));
    assert_eq!(machine.state(), GestureState::Dragging);

    feed(&mut machine, &mut view, TouchFrame::moved(point(760.0, 400.0)));
    let offset = view.renderer().dragging();
    assert!((offset.x - 0.15).abs() < 1e-4, "x={}", offset.x);

    feed(&mut machine, &mut view, TouchFrame::up(point(760.0, 400.0)));
    assert_eq!(machine.state(), GestureState::Final);
}

#[test]
fn zoomed_view_routes_a_single_finger_to_panning() {
    let (mut machine, mut view) = setup();
    let near = [point(300.0, 400.0), point(500.0, 400.0)];
    let far = [point(100.0, 400.0), point(700.0, 400.0)];

    // Zoom in first.
    feed(&mut machine, &mut view, TouchFrame::down(point(40.0, 400.0)));
    feed(&mut machine, &mut view, TouchFrame::pointer_down(&near));
    feed(&mut machine, &mut view, TouchFrame::multi_move(&near));
    feed(&mut machine, &mut view, TouchFrame::multi_move(&far));
    feed(&mut machine, &mut view, TouchFrame::pointer_up(&far, 0));
    feed(&mut machine, &mut view, TouchFrame::up(point(700.0, 400.0)));
    assert_eq!(machine.state(), GestureState::Final);
    assert_eq!(view.view_state(), ViewState::Resized);

    // A fresh single-finger touch on the zoomed view pans instead of
    // curling, even at the page edge.
    feed(&mut machine, &mut view, TouchFrame::down(point(780.0, 400.0)));
    assert_eq!(machine.state(), GestureState::Dragging);
}

#[test]
fn hot_area_tap_surfaces_a_view_event() {
    let (mut machine, mut view) = setup();
    machine
        .transformer_mut()
        .set_hot_areas(vec![Area::new(3, point(0.0, 0.0), 120.0, 120.0)]);

    feed(&mut machine, &mut view, TouchFrame::down(point(60.0, 60.0)));
    assert_eq!(machine.state(), GestureState::HotAreaHit);
    assert!(view.take_events().is_empty());

    feed(&mut machine, &mut view, TouchFrame::up(point(60.0, 60.0)));
    assert_eq!(machine.state(), GestureState::Init);
    assert_eq!(view.take_events(), vec![ViewEvent::HotAreaPressed(3)]);
}
