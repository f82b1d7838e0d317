//! Integration tests for the backdrop lifecycle.
//!
//! These drive an [`Animator`] through a [`ManualHost`] and a [`DrawList`],
//! the same way the window shell drives it with winit and wgpu.

use std::cell::RefCell;
use std::rc::Rc;

use particle_backdrop::prelude::*;
use particle_backdrop::{link_opacity, particle_count, ListenerId};

/// A [`ManualHost`] the test keeps a handle to after the animator is gone.
#[derive(Clone)]
struct SharedHost(Rc<RefCell<ManualHost>>);

impl Host for SharedHost {
    fn viewport(&self) -> Viewport {
        self.0.borrow().viewport()
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.0.borrow_mut().request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.0.borrow_mut().cancel_frame(handle);
    }

    fn listen_resize(&mut self) -> ListenerId {
        self.0.borrow_mut().listen_resize()
    }

    fn unlisten_resize(&mut self, id: ListenerId) {
        self.0.borrow_mut().unlisten_resize(id);
    }
}

fn mount(width: u32, height: u32, seed: u64) -> Animator<ManualHost, DrawList> {
    Animator::mount(
        ManualHost::new(Viewport::new(width, height)),
        DrawList::default(),
        FieldConfig::new().with_seed(seed),
    )
}

/// Deliver up to `frames` frames, returning how many actually ticked.
fn run_frames(animator: &mut Animator<ManualHost, DrawList>, frames: usize) -> usize {
    let mut ticked = 0;
    for _ in 0..frames {
        let Some(handle) = animator.host_mut().next_frame() else {
            break;
        };
        if animator.on_frame(handle).unwrap().is_some() {
            ticked += 1;
        }
    }
    ticked
}

// ============================================================================
// Mount
// ============================================================================

#[test]
fn test_mount_scenarios() {
    assert_eq!(mount(800, 600, 1).field().len(), 16);
    assert_eq!(mount(2000, 2000, 1).field().len(), 25);
    assert_eq!(mount(120, 80, 1).field().len(), 0);
}

#[test]
fn test_mount_sizes_surface_to_viewport() {
    let animator = mount(1024, 768, 2);
    assert_eq!(animator.surface().viewport(), Viewport::new(1024, 768));
    assert_eq!(animator.field().viewport(), Viewport::new(1024, 768));
}

#[test]
fn test_loop_runs_one_tick_per_frame() {
    let mut animator = mount(800, 600, 3);

    assert_eq!(run_frames(&mut animator, 120), 120);
    assert_eq!(animator.surface().presented(), 120);
    assert_eq!(animator.surface().clears(), 120);
    // Exactly one frame is scheduled at any time.
    assert_eq!(animator.host().pending_frames().len(), 1);
    assert_eq!(animator.host().frames_requested(), 121);
}

// ============================================================================
// Per-tick invariants
// ============================================================================

#[test]
fn test_particles_stay_in_bounds_and_in_range() {
    let mut animator = mount(800, 600, 4);

    for _ in 0..400 {
        run_frames(&mut animator, 1);
        let viewport = animator.field().viewport();
        for p in animator.field().particles() {
            assert!(viewport.contains(p.position));
            assert!(p.life >= 1 && p.life <= p.life_span);
            assert!((100..=200).contains(&p.life_span));
            assert!(p.opacity >= 0.0 && p.opacity <= 0.7 + 1e-6);
        }
    }
}

#[test]
fn test_drawn_lines_match_link_rule() {
    let mut animator = mount(600, 500, 5);
    let style = LinkStyle::default();

    for _ in 0..60 {
        run_frames(&mut animator, 1);
        let particles = animator.field().particles();

        let mut expected = Vec::new();
        for i in 0..particles.len() {
            for j in (i + 1)..particles.len() {
                let d2 = particles[i].position.distance_squared(particles[j].position);
                if let Some(opacity) = link_opacity(d2, &style) {
                    assert!(d2 < 10_000.0);
                    expected.push((particles[i].position, particles[j].position, opacity));
                }
            }
        }

        let lines = animator.surface().lines();
        assert_eq!(lines.len(), expected.len());
        for (line, (from, to, opacity)) in lines.iter().zip(&expected) {
            assert_eq!(line.from, from.to_array());
            assert_eq!(line.to, to.to_array());
            assert!((line.color[3] - opacity).abs() < 1e-6);
        }
    }
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_reseeds_for_new_area() {
    let mut animator = mount(800, 600, 6);
    run_frames(&mut animator, 10);

    animator.host_mut().set_viewport(Viewport::new(2000, 2000));
    animator.on_resize(Viewport::new(2000, 2000));

    assert_eq!(animator.state(), AnimatorState::Running);
    assert_eq!(animator.field().len(), 25);
    assert_eq!(animator.surface().viewport(), Viewport::new(2000, 2000));
    assert_eq!(run_frames(&mut animator, 5), 5);
}

#[test]
fn test_resize_twice_same_size_same_count() {
    let mut animator = mount(800, 600, 7);
    let viewport = Viewport::new(1366, 768);

    animator.on_resize(viewport);
    let first = animator.field().len();
    animator.on_resize(viewport);
    let second = animator.field().len();

    assert_eq!(first, second);
    assert_eq!(first, particle_count(viewport, &FieldConfig::default()));
    assert_eq!(animator.host().pending_frames().len(), 1);
}

#[test]
fn test_frame_scheduled_before_resize_never_runs() {
    let mut animator = mount(800, 600, 8);
    let before_resize = animator.pending_frame().unwrap();

    animator.on_resize(Viewport::new(400, 300));

    assert!(!animator.host().pending_frames().contains(&before_resize));
    assert_eq!(animator.on_frame(before_resize).unwrap(), None);
    assert_eq!(animator.surface().presented(), 0);
}

#[test]
fn test_rapid_resizes_keep_a_single_frame() {
    let mut animator = mount(800, 600, 9);
    for width in (400..1600).step_by(40) {
        animator.on_resize(Viewport::new(width, 700));
    }
    assert_eq!(animator.host().pending_frames().len(), 1);
    assert_eq!(run_frames(&mut animator, 3), 3);
}

// ============================================================================
// Unmount
// ============================================================================

#[test]
fn test_unmount_right_after_mount_never_draws() {
    let mut animator = mount(800, 600, 10);
    let scheduled = animator.pending_frame().unwrap();

    animator.unmount();

    assert_eq!(animator.state(), AnimatorState::Stopped);
    assert_eq!(animator.host_mut().next_frame(), None);
    assert_eq!(animator.on_frame(scheduled).unwrap(), None);
    assert_eq!(animator.surface().presented(), 0);
    assert_eq!(animator.surface().clears(), 0);
    assert_eq!(animator.surface().draw_calls(), 0);
}

#[test]
fn test_unmount_after_running_stops_loop() {
    let mut animator = mount(800, 600, 11);
    run_frames(&mut animator, 30);
    let presented = animator.surface().presented();

    animator.unmount();

    assert_eq!(run_frames(&mut animator, 30), 0);
    assert_eq!(animator.surface().presented(), presented);
    assert!(animator.host().listeners().is_empty());
    assert!(!animator.is_listening());
}

#[test]
fn test_dropping_running_animator_releases_host_resources() {
    let host = SharedHost(Rc::new(RefCell::new(ManualHost::new(Viewport::new(800, 600)))));
    {
        let mut animator = Animator::mount(
            host.clone(),
            DrawList::default(),
            FieldConfig::new().with_seed(14),
        );
        let handle = host.0.borrow_mut().next_frame().unwrap();
        animator.on_frame(handle).unwrap();

        assert_eq!(animator.state(), AnimatorState::Running);
        assert_eq!(host.0.borrow().pending_frames().len(), 1);
        assert_eq!(host.0.borrow().listeners().len(), 1);
    }

    let host = host.0.borrow();
    assert!(host.pending_frames().is_empty());
    assert!(host.listeners().is_empty());
    assert_eq!(host.frames_cancelled(), 1);
}

#[test]
fn test_stopped_animator_stays_stopped() {
    let mut animator = mount(800, 600, 12);
    animator.unmount();
    animator.on_resize(Viewport::new(1000, 1000));

    assert_eq!(animator.state(), AnimatorState::Stopped);
    assert_eq!(animator.host().frames_requested(), 1);
    assert!(animator.host().listeners().is_empty());
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let mut a = mount(900, 700, 13);
    let mut b = mount(900, 700, 13);
    run_frames(&mut a, 250);
    run_frames(&mut b, 250);

    assert_eq!(a.field().particles(), b.field().particles());
}
