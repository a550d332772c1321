//! Benchmark for brain ticks and perception.
//!
//! Run with: cargo bench --package courier_ai --bench brain_benchmark

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use courier_ai::{senses, AiBrain, AiStateType, Navigator, NpcConfig, RaycastHit, WorldQuery};
use courier_shared::{EntityId, FrameTime, Vec3, DEFAULT_DELTA};

/// Entities on a ring around the origin; every ray hits whatever it aims at.
struct Ring {
    positions: Vec<Vec3>,
}

impl Ring {
    fn new(count: u32) -> Self {
        let positions = (0..count)
            .map(|i| {
                if i == 0 {
                    return Vec3::ZERO;
                }
                let angle = i as f32 * 0.37;
                Vec3::new(angle.sin() * 12.0, 0.0, angle.cos() * 12.0)
            })
            .collect();
        Self { positions }
    }
}

impl WorldQuery for Ring {
    fn overlap_sphere(&self, center: Vec3, radius: f32, _layer_mask: u32) -> Vec<EntityId> {
        (0..self.positions.len() as u32)
            .filter(|&i| self.positions[i as usize].distance(center) <= radius)
            .map(|i| EntityId::new(i, 0))
            .collect()
    }

    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RaycastHit> {
        let dir = direction.normalized();
        self.positions
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| {
                let along = (p - origin).dot(dir);
                let point = origin + dir * along;
                (along > 0.0 && along <= max_distance && point.distance(p) <= 0.5).then_some(RaycastHit {
                    entity: EntityId::new(i as u32, 0),
                    distance: along,
                    point,
                })
            })
            .collect()
    }

    fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.positions.get(entity.index() as usize).copied()
    }

    fn forward(&self, entity: EntityId) -> Option<Vec3> {
        self.position(entity).map(|_| Vec3::Z)
    }

    fn tag(&self, _entity: EntityId) -> Option<&str> {
        Some("Player")
    }

    fn is_alive(&self, entity: EntityId) -> bool {
        (entity.index() as usize) < self.positions.len()
    }
}

#[derive(Default)]
struct NullNavigator;

impl Navigator for NullNavigator {
    fn set_destination(&mut self, _position: Vec3) {}
    fn set_stopped(&mut self, _stopped: bool) {}
    fn is_stopped(&self) -> bool {
        false
    }
    fn remaining_distance(&self) -> f32 {
        0.0
    }
    fn face_towards(&mut self, _direction: Vec3) {}
    fn configure(&mut self, _speed: f32, _angular_speed: f32, _stopping_distance: f32) {}
}

fn benchmark_perception(c: &mut Criterion) {
    let mut group = c.benchmark_group("look_for_targets");
    let config = NpcConfig::default();

    for count in [16u32, 128, 512] {
        let ring = Ring::new(count);
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::from_parameter(count), &ring, |b, ring| {
            b.iter(|| black_box(senses::look_for_targets(ring, EntityId::new(0, 0), &config)));
        });
    }
    group.finish();
}

fn benchmark_brain_tick(c: &mut Criterion) {
    let ring = Ring::new(64);
    let config = Arc::new(NpcConfig {
        ai_state_types: vec![AiStateType::Attack, AiStateType::Chase, AiStateType::CombatIdle, AiStateType::Idle],
        ..NpcConfig::default()
    });
    let Ok(mut brain) = AiBrain::new(EntityId::new(0, 0), config, NullNavigator, 42) else {
        return;
    };

    c.bench_function("brain_tick_64_entities", |b| {
        let mut frame = 0u64;
        b.iter(|| {
            brain.update(black_box(&ring), FrameTime::new(DEFAULT_DELTA, frame));
            frame += 1;
        });
    });
}

criterion_group!(benches, benchmark_perception, benchmark_brain_tick);
criterion_main!(benches);
