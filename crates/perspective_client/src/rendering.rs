use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderRef, ShaderType};
use perspective_simulation::camera::PV_ROW_NAMES;
use perspective_simulation::character::{CharacterSprite, CurrentAnimation, SpriteAnimations};
use perspective_simulation::{CameraBoom, CameraRig, EyeCamera, ParameterCollections, PerspectiveSet, LOS_COLLECTION};

pub struct RenderingSyncPlugin;

impl Plugin for RenderingSyncPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<LineOfSightMaterial>::default())
            .add_systems(Update, (
                attach_visibility,
                spawn_sprite_visuals,
                (sync_line_of_sight_rows, swap_sprite_flipbook).after(PerspectiveSet::Sprite),
            ).chain());
    }
}

/// Uniform block line-of-sight shader'а (layout совпадает с WGSL)
#[derive(ShaderType, Debug, Clone, Copy)]
pub struct LineOfSightUniform {
    pub base_color: Vec4,
    pub pv_row0: Vec4,
    pub pv_row1: Vec4,
    pub pv_row2: Vec4,
    pub pv_row3: Vec4,
}

/// Level material: освещён внутри frustum eye камеры, затемнён снаружи
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct LineOfSightMaterial {
    #[uniform(0)]
    pub uniform: LineOfSightUniform,
}

impl LineOfSightMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            uniform: LineOfSightUniform {
                base_color: color.to_linear().to_vec4(),
                pv_row0: Vec4::ZERO,
                pv_row1: Vec4::ZERO,
                pv_row2: Vec4::ZERO,
                pv_row3: Vec4::ZERO,
            },
        }
    }

    fn set_rows(&mut self, rows: [Vec4; 4]) {
        self.uniform.pv_row0 = rows[0];
        self.uniform.pv_row1 = rows[1];
        self.uniform.pv_row2 = rows[2];
        self.uniform.pv_row3 = rows[3];
    }
}

impl Material for LineOfSightMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/line_of_sight.wgsl".into()
    }
}

/// Simulation spawn'ит rig без Visibility (headless), добавляем здесь
fn attach_visibility(
    mut commands: Commands,
    query: Query<Entity, Or<(Added<CameraRig>, Added<CameraBoom>, Added<EyeCamera>, Added<CharacterSprite>)>>,
) {
    for entity in query.iter() {
        commands.entity(entity).insert(Visibility::default());
    }
}

/// Handle sprite материала (flipbook texture меняется при смене анимации)
#[derive(Component)]
pub struct SpriteMaterial(pub Handle<StandardMaterial>);

/// Quad mesh на sprite entity
fn spawn_sprite_visuals(
    mut commands: Commands,
    query: Query<(Entity, &SpriteAnimations, &CurrentAnimation), Added<CharacterSprite>>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, animations, current) in query.iter() {
        let material = materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load(animations.path(current.0).to_string())),
            alpha_mode: AlphaMode::Mask(0.5),
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        });

        commands.entity(entity).insert((
            Mesh3d(meshes.add(Rectangle::new(1.0, 2.0))),
            MeshMaterial3d(material.clone()),
            SpriteMaterial(material),
        ));
    }
}

fn swap_sprite_flipbook(
    query: Query<(&SpriteAnimations, &CurrentAnimation, &SpriteMaterial), Changed<CurrentAnimation>>,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (animations, current, handle) in query.iter() {
        if let Some(material) = materials.get_mut(&handle.0) {
            material.base_color_texture = Some(asset_server.load(animations.path(current.0).to_string()));
        }
    }
}

/// Collection rows → uniform всех LOS материалов (только при новой revision)
fn sync_line_of_sight_rows(
    collections: Option<Res<ParameterCollections>>,
    mut materials: ResMut<Assets<LineOfSightMaterial>>,
    mut last_revision: Local<u64>,
) {
    let Some(collection) = collections.as_ref().and_then(|c| c.get(LOS_COLLECTION)) else {
        return;
    };
    if collection.revision() == *last_revision {
        return;
    }
    *last_revision = collection.revision();

    let mut rows = [Vec4::ZERO; 4];
    for (row, name) in rows.iter_mut().zip(PV_ROW_NAMES) {
        *row = collection.vector(name).unwrap_or(Vec4::ZERO);
    }

    for (_id, material) in materials.iter_mut() {
        material.set_rows(rows);
    }
}
