//! Small COLLADA documents shared by the unit tests.

/// Two triangles of a unit quad with a red lambert material and no normals or UVs.
pub const TRIANGLE_PAIR: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<COLLADA xmlns="http://www.collada.org/2005/11/COLLADASchema" version="1.4.1">
  <library_effects>
    <effect id="Red-effect">
      <profile_COMMON>
        <technique sid="common">
          <lambert>
            <diffuse><color sid="diffuse">1 0 0 1</color></diffuse>
          </lambert>
        </technique>
      </profile_COMMON>
    </effect>
  </library_effects>
  <library_materials>
    <material id="Red" name="Red"><instance_effect url="#Red-effect"/></material>
  </library_materials>
  <library_geometries>
    <geometry id="Quad-mesh" name="Quad">
      <mesh>
        <source id="Quad-positions">
          <float_array id="Quad-positions-array" count="12">0 0 0 1 0 0 1 1 0 0 1 0</float_array>
          <technique_common>
            <accessor source="#Quad-positions-array" count="4" stride="3">
              <param name="X" type="float"/><param name="Y" type="float"/><param name="Z" type="float"/>
            </accessor>
          </technique_common>
        </source>
        <vertices id="Quad-vertices">
          <input semantic="POSITION" source="#Quad-positions"/>
        </vertices>
        <triangles material="RedSG" count="2">
          <input semantic="VERTEX" source="#Quad-vertices" offset="0"/>
          <p>0 1 2 0 2 3</p>
        </triangles>
      </mesh>
    </geometry>
  </library_geometries>
  <library_visual_scenes>
    <visual_scene id="Scene" name="Scene">
      <node id="Quad" name="Quad" type="NODE">
        <matrix sid="transform">1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1</matrix>
        <instance_geometry url="#Quad-mesh" name="Quad">
          <bind_material>
            <technique_common>
              <instance_material symbol="RedSG" target="#Red"/>
            </technique_common>
          </bind_material>
        </instance_geometry>
      </node>
    </visual_scene>
  </library_visual_scenes>
  <scene>
    <instance_visual_scene url="#Scene"/>
  </scene>
</COLLADA>
"##;

/// A textured quad with one normal, one UV set, and a `<lines>` primitive,
/// placed under a translated parent node. The image path is relative.
pub const TEXTURED_QUAD: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<COLLADA xmlns="http://www.collada.org/2005/11/COLLADASchema" version="1.4.1">
  <library_images>
    <image id="checker-png" name="checker">
      <init_from>textures/checker.png</init_from>
    </image>
  </library_images>
  <library_effects>
    <effect id="Checker-effect">
      <profile_COMMON>
        <newparam sid="checker-surface">
          <surface type="2D"><init_from>checker-png</init_from></surface>
        </newparam>
        <newparam sid="checker-sampler">
          <sampler2D><source>checker-surface</source></sampler2D>
        </newparam>
        <technique sid="common">
          <phong>
            <diffuse><texture texture="checker-sampler" texcoord="UVMap"/></diffuse>
          </phong>
        </technique>
      </profile_COMMON>
    </effect>
  </library_effects>
  <library_materials>
    <material id="Checker" name="Checker"><instance_effect url="#Checker-effect"/></material>
  </library_materials>
  <library_geometries>
    <geometry id="Plane-mesh" name="Plane">
      <mesh>
        <source id="Plane-positions">
          <float_array id="Plane-positions-array" count="12">0 0 0 1 0 0 1 1 0 0 1 0</float_array>
          <technique_common>
            <accessor source="#Plane-positions-array" count="4" stride="3"/>
          </technique_common>
        </source>
        <source id="Plane-normals">
          <float_array id="Plane-normals-array" count="3">0 0 1</float_array>
          <technique_common>
            <accessor source="#Plane-normals-array" count="1" stride="3"/>
          </technique_common>
        </source>
        <source id="Plane-map">
          <float_array id="Plane-map-array" count="8">0 0 1 0 1 1 0 1</float_array>
          <technique_common>
            <accessor source="#Plane-map-array" count="4" stride="2"/>
          </technique_common>
        </source>
        <vertices id="Plane-vertices">
          <input semantic="POSITION" source="#Plane-positions"/>
        </vertices>
        <triangles material="CheckerSG" count="2">
          <input semantic="VERTEX" source="#Plane-vertices" offset="0"/>
          <input semantic="NORMAL" source="#Plane-normals" offset="1"/>
          <input semantic="TEXCOORD" source="#Plane-map" offset="2" set="0"/>
          <p>1 0 1 2 0 2 0 0 0 2 0 2 3 0 3 0 0 0</p>
        </triangles>
        <lines material="CheckerSG" count="1">
          <input semantic="VERTEX" source="#Plane-vertices" offset="0"/>
          <p>0 1</p>
        </lines>
      </mesh>
    </geometry>
  </library_geometries>
  <library_visual_scenes>
    <visual_scene id="Scene">
      <node id="Root">
        <translate>10 0 0</translate>
        <node id="Plane">
          <translate>0 5 0</translate>
          <instance_geometry url="#Plane-mesh">
            <bind_material>
              <technique_common>
                <instance_material symbol="CheckerSG" target="#Checker"/>
              </technique_common>
            </bind_material>
          </instance_geometry>
        </node>
      </node>
    </visual_scene>
  </library_visual_scenes>
  <scene>
    <instance_visual_scene url="#Scene"/>
  </scene>
</COLLADA>
"##;

/// One triangle defined in `<library_nodes>` and instanced twice from the
/// visual scene through `<instance_node>`.
pub const INSTANCED_NODES: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<COLLADA xmlns="http://www.collada.org/2005/11/COLLADASchema" version="1.4.1">
  <library_geometries>
    <geometry id="Tri-mesh">
      <mesh>
        <source id="Tri-positions">
          <float_array id="Tri-positions-array" count="9">0 0 0 1 0 0 0 1 0</float_array>
          <technique_common>
            <accessor source="#Tri-positions-array" count="3" stride="3"/>
          </technique_common>
        </source>
        <vertices id="Tri-vertices">
          <input semantic="POSITION" source="#Tri-positions"/>
        </vertices>
        <triangles count="1">
          <input semantic="VERTEX" source="#Tri-vertices" offset="0"/>
          <p>0 1 2</p>
        </triangles>
      </mesh>
    </geometry>
  </library_geometries>
  <library_nodes>
    <node id="Tri-component">
      <translate>0 0 1</translate>
      <instance_geometry url="#Tri-mesh"/>
    </node>
  </library_nodes>
  <library_visual_scenes>
    <visual_scene id="Scene">
      <node id="Left">
        <translate>5 0 0</translate>
        <instance_node url="#Tri-component"/>
      </node>
      <node id="Top">
        <translate>0 3 0</translate>
        <instance_node url="#Tri-component"/>
      </node>
    </visual_scene>
  </library_visual_scenes>
  <scene>
    <instance_visual_scene url="#Scene"/>
  </scene>
</COLLADA>
"##;
