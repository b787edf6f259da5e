//! Decoding a mesh's interlaced stream back into per-vertex values.

use ember_core::color::Color;
use ember_core::math::{Point2, Point3, Vec3};
use ember_core::memory::{PackedBufferReader, Packer, UnpackError};

use super::{ColorPacker, Mesh, PointPacker, VectorPacker, VertexComponents};

/// One vertex read back out of a [`Mesh`].
///
/// Lanes beyond an attribute's logical component count are zero. Absent
/// attributes are all zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecodedVertex {
    pub position: [f32; 4],
    pub color: Color,
    pub uv: [f32; 3],
    pub normal: [f32; 4],
    pub tangent: [f32; 4],
    pub bitangent: [f32; 4],
}

impl DecodedVertex {
    pub fn position_2d(&self) -> Point2 {
        Point2::new(self.position[0], self.position[1])
    }

    pub fn position_3d(&self) -> Point3 {
        Point3::new(self.position[0], self.position[1], self.position[2])
    }

    pub fn normal_3d(&self) -> Vec3 {
        Vec3::new(self.normal[0], self.normal[1], self.normal[2])
    }

    pub fn tangent_3d(&self) -> Vec3 {
        Vec3::new(self.tangent[0], self.tangent[1], self.tangent[2])
    }

    pub fn bitangent_3d(&self) -> Vec3 {
        Vec3::new(self.bitangent[0], self.bitangent[1], self.bitangent[2])
    }
}

/// Iterator over the decoded vertices of a [`Mesh`].
pub struct VertexIter<'a> {
    reader: PackedBufferReader<'a>,
    components: VertexComponents,
    remaining: usize,
}

impl<'a> VertexIter<'a> {
    pub(super) fn new(mesh: &'a Mesh) -> Self {
        Self {
            reader: mesh.vertex_data().reader(),
            components: mesh.components(),
            remaining: mesh.vertex_count(),
        }
    }

    fn decode(&mut self) -> Result<DecodedVertex, UnpackError> {
        let components = self.components;
        self.reader.rewind_on_error(|reader| {
            let mut vertex = DecodedVertex::default();
            let (position, uv) = (components.position, components.uv);
            read_lanes(
                reader,
                &PointPacker,
                &mut vertex.position,
                position,
                position,
            )?;
            if components.color != 0 {
                let packer = ColorPacker::with_channels(components.color);
                vertex.color = reader.unpack_object_with(&packer)?;
            }
            read_lanes(reader, &PointPacker, &mut vertex.uv, uv, uv)?;
            for (lanes, count) in [
                (&mut vertex.normal, components.normal),
                (&mut vertex.tangent, components.tangent),
                (&mut vertex.bitangent, components.bitangent),
            ] {
                let stored = VertexComponents::padded(count);
                read_lanes(reader, &VectorPacker, lanes, count, stored)?;
            }
            Ok(vertex)
        })
    }
}

/// Read `stored` scalars, keeping the first `logical` of them in `dst`.
fn read_lanes<P: Packer<f32>>(
    reader: &mut PackedBufferReader<'_>,
    packer: &P,
    dst: &mut [f32],
    logical: u8,
    stored: u8,
) -> Result<(), UnpackError> {
    for lane in 0..stored as usize {
        let value = reader.unpack_object_with(packer)?;
        if lane < logical as usize {
            dst[lane] = value;
        }
    }
    Ok(())
}

impl Iterator for VertexIter<'_> {
    type Item = Result<DecodedVertex, UnpackError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.decode())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for VertexIter<'_> {}

#[cfg(test)]
mod tests {
    use ember_core::memory::PackedBuffer;

    use super::*;
    use crate::mesh::{MeshConfig, PrimitiveTopology};

    #[test]
    fn decodes_each_attribute() {
        let mut data = PackedBuffer::new();
        let mut writer = data.writer();
        for i in 0..2 {
            let x = i as f32;
            writer.pack_object_with(&Point3::new(x, 2.0, 3.0), &PointPacker);
            writer.pack_object_with(&Color::BLUE, &ColorPacker::new());
            writer.pack_object_with(&ember_core::math::Vec2::new(0.5, x), &PointPacker);
            writer.pack_object_with(&Vec3::new(0.0, 0.0, 1.0), &VectorPacker);
        }
        let mesh = Mesh::new(
            MeshConfig::new(PrimitiveTopology::Points)
                .with_vertex_data(data)
                .with_components(VertexComponents {
                    position: 3,
                    color: 4,
                    uv: 2,
                    normal: 3,
                    ..Default::default()
                }),
        )
        .unwrap();
        assert_eq!(mesh.stride(), 12 + 4 + 8 + 8);

        let vertices: Vec<_> = mesh.vertices().collect::<Result<_, _>>().unwrap();
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].position_3d(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(vertices[1].position[3], 0.0);
        assert_eq!(vertices[0].color, Color::BLUE);
        assert_eq!(vertices[1].uv, [0.5, 1.0, 0.0]);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(vertices[0].tangent, [0.0; 4]);
    }

    #[test]
    fn empty_mesh_has_no_vertices() {
        let mesh = Mesh::new(MeshConfig::new(PrimitiveTopology::Points)).unwrap();
        let mut vertices = mesh.vertices();
        assert_eq!(vertices.len(), 0);
        assert!(vertices.next().is_none());
    }
}
